use socialscope_core::{AppConfig, DEFAULT_TIKWM_BASE_URL};

/// Base URLs for every upstream the adapters talk to.
///
/// Production code uses [`Endpoints::default`]; tests point every field at a
/// local mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub instagram_web: String,
    pub instagram_api: String,
    pub facebook_mobile: String,
    pub facebook_web: String,
    pub tiktok_web: String,
    pub tikwm_api: String,
    pub threads_web: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            instagram_web: "https://www.instagram.com".to_owned(),
            instagram_api: "https://i.instagram.com".to_owned(),
            facebook_mobile: "https://m.facebook.com".to_owned(),
            facebook_web: "https://www.facebook.com".to_owned(),
            tiktok_web: "https://www.tiktok.com".to_owned(),
            tikwm_api: DEFAULT_TIKWM_BASE_URL.to_owned(),
            threads_web: "https://www.threads.net".to_owned(),
        }
    }
}

impl Endpoints {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            tikwm_api: config.tikwm_base_url.clone(),
            ..Self::default()
        }
    }

    /// Every endpoint rooted at `base`, as used by mock-server tests.
    #[must_use]
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_owned();
        Self {
            instagram_web: base.clone(),
            instagram_api: base.clone(),
            facebook_mobile: base.clone(),
            facebook_web: base.clone(),
            tiktok_web: base.clone(),
            tikwm_api: base.clone(),
            threads_web: base,
        }
    }
}
