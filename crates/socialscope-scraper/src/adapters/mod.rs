//! Per-platform extraction.
//!
//! Every adapter sanitizes the identity, builds its strategy chain over a
//! shared [`AdapterContext`], and maps upstream shapes into the canonical
//! profile for its platform.

mod de;
pub(crate) mod facebook;
pub(crate) mod instagram;
pub(crate) mod threads;
pub(crate) mod tiktok;

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tokio::sync::OnceCell;

use crate::endpoints::Endpoints;
use crate::error::ExtractError;
use crate::transport::{FetchOptions, HttpTransport};

/// Characters left as-is in a profile path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'_').remove(b'-');

/// Per-request timeouts by endpoint class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTimeouts {
    /// Primary profile pages.
    pub page: Duration,
    /// Secondary web fallbacks.
    pub web: Duration,
    /// JSON APIs.
    pub api: Duration,
}

impl Default for LookupTimeouts {
    fn default() -> Self {
        Self {
            page: Duration::from_secs(30),
            web: Duration::from_secs(15),
            api: Duration::from_secs(10),
        }
    }
}

/// Everything an adapter needs for one resolution.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AdapterContext<'a> {
    pub transport: &'a HttpTransport,
    pub endpoints: &'a Endpoints,
    pub timeouts: LookupTimeouts,
}

/// A page fetched at most once per resolution, however many strategies
/// read it.
pub(crate) struct SharedPage<'a> {
    transport: &'a HttpTransport,
    url: String,
    options: FetchOptions,
    body: OnceCell<Result<String, String>>,
}

impl<'a> SharedPage<'a> {
    pub(crate) fn new(transport: &'a HttpTransport, url: String, options: FetchOptions) -> Self {
        Self {
            transport,
            url,
            options,
            body: OnceCell::new(),
        }
    }

    /// Returns the page body, fetching it on first use.
    ///
    /// A failed fetch is remembered, so later strategies fail fast instead of
    /// retrying the same URL.
    pub(crate) async fn text(&self) -> Result<&str, ExtractError> {
        let body = self
            .body
            .get_or_init(|| async {
                self.transport
                    .fetch_text(&self.url, &self.options)
                    .await
                    .map_err(|e| e.to_string())
            })
            .await;
        match body {
            Ok(text) => Ok(text.as_str()),
            Err(reason) => Err(ExtractError::PageUnavailable {
                url: self.url.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

/// `{base}/{prefix}{identity}{suffix}` with the identity percent-encoded.
pub(crate) fn profile_url(base: &str, prefix: &str, identity: &str, suffix: &str) -> String {
    format!(
        "{}/{prefix}{}{suffix}",
        base.trim_end_matches('/'),
        utf8_percent_encode(identity, PATH_SEGMENT)
    )
}

/// Returns `true` when `html` contains any of `needles`.
pub(crate) fn contains_any(html: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| html.contains(n))
}
