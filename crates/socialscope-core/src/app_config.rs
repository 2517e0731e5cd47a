#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Desktop browser identity sent when no override is configured.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Public base URL of the TikTok aggregation API.
pub const DEFAULT_TIKWM_BASE_URL: &str = "https://www.tikwm.com";

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Timeout for primary profile pages.
    pub page_timeout_secs: u64,
    /// Timeout for secondary web fallbacks.
    pub web_timeout_secs: u64,
    /// Timeout for JSON API endpoints.
    pub api_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for transient errors.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `retry_backoff_base_ms * 2^(n-1)`.
    pub retry_backoff_base_ms: u64,
    pub max_concurrent_lookups: usize,
    pub tikwm_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: Environment::Development,
            log_level: "info".to_string(),
            page_timeout_secs: 30,
            web_timeout_secs: 15,
            api_timeout_secs: 10,
            connect_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_retries: 2,
            retry_backoff_base_ms: 1_000,
            max_concurrent_lookups: 4,
            tikwm_base_url: DEFAULT_TIKWM_BASE_URL.to_string(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("page_timeout_secs", &self.page_timeout_secs)
            .field("web_timeout_secs", &self.web_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("max_concurrent_lookups", &self.max_concurrent_lookups)
            .field("tikwm_base_url", &self.tikwm_base_url)
            .finish()
    }
}
