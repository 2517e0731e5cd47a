use crate::app_config::{AppConfig, Environment, DEFAULT_TIKWM_BASE_URL, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional. The lookup is injected so parsing can be
/// tested with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let value = parse_u64(var, default)?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("SOCIALSCOPE_ENV", "development"))?;
    let log_level = or_default("SOCIALSCOPE_LOG_LEVEL", "info");

    let page_timeout_secs = parse_positive_u64("SOCIALSCOPE_PAGE_TIMEOUT_SECS", "30")?;
    let web_timeout_secs = parse_positive_u64("SOCIALSCOPE_WEB_TIMEOUT_SECS", "15")?;
    let api_timeout_secs = parse_positive_u64("SOCIALSCOPE_API_TIMEOUT_SECS", "10")?;
    let connect_timeout_secs = parse_positive_u64("SOCIALSCOPE_CONNECT_TIMEOUT_SECS", "10")?;

    let user_agent = or_default("SOCIALSCOPE_USER_AGENT", DEFAULT_USER_AGENT);
    let max_retries = parse_u32("SOCIALSCOPE_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("SOCIALSCOPE_RETRY_BACKOFF_BASE_MS", "1000")?;

    let raw_concurrency = or_default("SOCIALSCOPE_MAX_CONCURRENT_LOOKUPS", "4");
    let max_concurrent_lookups = match raw_concurrency.parse::<usize>() {
        Ok(0) => {
            return Err(ConfigError::InvalidEnvVar {
                var: "SOCIALSCOPE_MAX_CONCURRENT_LOOKUPS".to_string(),
                reason: "must be at least 1".to_string(),
            })
        }
        Ok(n) => n,
        Err(e) => {
            return Err(ConfigError::InvalidEnvVar {
                var: "SOCIALSCOPE_MAX_CONCURRENT_LOOKUPS".to_string(),
                reason: e.to_string(),
            })
        }
    };

    let tikwm_base_url = or_default("SOCIALSCOPE_TIKWM_BASE_URL", DEFAULT_TIKWM_BASE_URL)
        .trim_end_matches('/')
        .to_string();

    Ok(AppConfig {
        env,
        log_level,
        page_timeout_secs,
        web_timeout_secs,
        api_timeout_secs,
        connect_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        max_concurrent_lookups,
        tikwm_base_url,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SOCIALSCOPE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
