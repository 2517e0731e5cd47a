mod app_config;
mod config;
pub mod platform;
pub mod profile;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, DEFAULT_TIKWM_BASE_URL, DEFAULT_USER_AGENT};
pub use config::{load_app_config, load_app_config_from_env};
pub use platform::{Platform, UnknownPlatform};
pub use profile::{
    timestamp_to_datetime, CanonicalProfile, FacebookPost, FacebookProfile, InstagramPost,
    InstagramProfile, Profile, StoryAudio, StoryMedia, ThreadsPost, ThreadsProfile,
    TikTokProfile, TikTokStory, TikTokVideo, MAX_CONTENT_ITEMS, MAX_FACEBOOK_POSTS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
