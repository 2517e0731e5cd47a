use thiserror::Error;

/// Transport-level failure surfaced by [`crate::HttpTransport`].
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {url} (retry after {retry_after_secs}s)")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a single extraction strategy failed.
///
/// Strategies report "ran fine but found nothing" as `Ok(None)`; this type
/// covers everything else. The chain runner logs it and moves on, so it
/// never reaches callers of the adapters.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Transport(#[from] ScraperError),

    #[error("could not decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The shared page fetch failed earlier in this resolution.
    #[error("page {url} unavailable: {reason}")]
    PageUnavailable { url: String, reason: String },

    #[error("upstream rejected the request: {reason}")]
    Rejected { reason: String },

    #[error("strategy {strategy} panicked")]
    Panicked { strategy: &'static str },
}

impl ExtractError {
    pub(crate) fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        ExtractError::Decode {
            context: context.into(),
            source,
        }
    }
}
