//! Entry point: one resolver shared by every lookup.

use std::sync::Arc;
use std::time::Duration;

use socialscope_core::{
    AppConfig, FacebookProfile, InstagramProfile, Platform, Profile, ThreadsProfile, TikTokProfile,
};

use crate::adapters::{self, AdapterContext, LookupTimeouts};
use crate::chain::{Attempt, ChainOutcome};
use crate::endpoints::Endpoints;
use crate::error::ScraperError;
use crate::normalize::sanitize_identity;
use crate::transport::{HttpTransport, TransportConfig};

/// Outcome of [`ProfileResolver::resolve`].
///
/// Strategy failures never surface here; they are logged and recorded in
/// [`Resolution::attempts`].
#[derive(Debug)]
pub enum Resolution {
    Found {
        profile: Profile,
        attempts: Vec<Attempt>,
    },
    NotFound {
        attempts: Vec<Attempt>,
    },
}

impl Resolution {
    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Resolution::Found { profile, .. } => Some(profile),
            Resolution::NotFound { .. } => None,
        }
    }

    #[must_use]
    pub fn into_profile(self) -> Option<Profile> {
        match self {
            Resolution::Found { profile, .. } => Some(profile),
            Resolution::NotFound { .. } => None,
        }
    }

    #[must_use]
    pub fn attempts(&self) -> &[Attempt] {
        match self {
            Resolution::Found { attempts, .. } | Resolution::NotFound { attempts } => attempts,
        }
    }

    fn from_outcome<P: Into<Profile>>(outcome: ChainOutcome<P>) -> Self {
        match outcome.profile {
            Some(profile) => Resolution::Found {
                profile: profile.into(),
                attempts: outcome.attempts,
            },
            None => Resolution::NotFound {
                attempts: outcome.attempts,
            },
        }
    }
}

/// Resolves social handles into canonical profiles.
///
/// Cheap to clone; clones share one HTTP connection pool. Nothing is cached
/// between calls, so every resolution hits the network afresh.
#[derive(Debug, Clone)]
pub struct ProfileResolver {
    transport: Arc<HttpTransport>,
    endpoints: Arc<Endpoints>,
    timeouts: LookupTimeouts,
}

impl ProfileResolver {
    #[must_use]
    pub fn new(transport: Arc<HttpTransport>, endpoints: Endpoints, timeouts: LookupTimeouts) -> Self {
        Self {
            transport,
            endpoints: Arc::new(endpoints),
            timeouts,
        }
    }

    /// Builds a resolver with a fresh transport from application config.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let transport = HttpTransport::new(&TransportConfig::from_app_config(config))?;
        let timeouts = LookupTimeouts {
            page: Duration::from_secs(config.page_timeout_secs),
            web: Duration::from_secs(config.web_timeout_secs),
            api: Duration::from_secs(config.api_timeout_secs),
        };
        Ok(Self::new(
            Arc::new(transport),
            Endpoints::from_app_config(config),
            timeouts,
        ))
    }

    fn context(&self) -> AdapterContext<'_> {
        AdapterContext {
            transport: &self.transport,
            endpoints: &self.endpoints,
            timeouts: self.timeouts,
        }
    }

    /// Resolves `identity` on `platform`.
    ///
    /// The identity is sanitized first; one that is empty afterwards
    /// resolves to [`Resolution::NotFound`] without any network traffic.
    pub async fn resolve(&self, platform: Platform, identity: &str) -> Resolution {
        let identity = sanitize_identity(identity);
        if identity.is_empty() {
            tracing::debug!(platform = %platform, "empty identity, nothing to resolve");
            return Resolution::NotFound {
                attempts: Vec::new(),
            };
        }

        let ctx = self.context();
        let resolution = match platform {
            Platform::Instagram => {
                Resolution::from_outcome(adapters::instagram::resolve(ctx, &identity).await)
            }
            Platform::Facebook => {
                Resolution::from_outcome(adapters::facebook::resolve(ctx, &identity).await)
            }
            Platform::TikTok => {
                Resolution::from_outcome(adapters::tiktok::resolve(ctx, &identity).await)
            }
            Platform::Threads => {
                Resolution::from_outcome(adapters::threads::resolve(ctx, &identity).await)
            }
        };

        match &resolution {
            Resolution::Found { attempts, .. } => tracing::info!(
                platform = %platform,
                identity = %identity,
                strategy = attempts.last().map_or("", |a| a.strategy),
                "profile resolved"
            ),
            Resolution::NotFound { attempts } => tracing::info!(
                platform = %platform,
                identity = %identity,
                attempts = attempts.len(),
                "profile not found"
            ),
        }
        resolution
    }

    pub async fn resolve_instagram(&self, identity: &str) -> Option<InstagramProfile> {
        match self.resolve(Platform::Instagram, identity).await.into_profile() {
            Some(Profile::Instagram(p)) => Some(p),
            _ => None,
        }
    }

    pub async fn resolve_facebook(&self, identity: &str) -> Option<FacebookProfile> {
        match self.resolve(Platform::Facebook, identity).await.into_profile() {
            Some(Profile::Facebook(p)) => Some(p),
            _ => None,
        }
    }

    pub async fn resolve_tiktok(&self, identity: &str) -> Option<TikTokProfile> {
        match self.resolve(Platform::TikTok, identity).await.into_profile() {
            Some(Profile::TikTok(p)) => Some(p),
            _ => None,
        }
    }

    pub async fn resolve_threads(&self, identity: &str) -> Option<ThreadsProfile> {
        match self.resolve(Platform::Threads, identity).await.into_profile() {
            Some(Profile::Threads(p)) => Some(p),
            _ => None,
        }
    }
}
