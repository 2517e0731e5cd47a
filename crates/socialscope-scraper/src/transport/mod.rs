//! Resilient HTTP transport shared by every platform adapter.

mod options;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL};
use reqwest::{Client, Url};
use socialscope_core::AppConfig;

use crate::error::ScraperError;
use crate::retry::retry_with_backoff;

pub use options::FetchOptions;

/// Desktop Chrome identity.
pub const DESKTOP_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Mobile Safari identity; several platforms serve lighter markup to it.
pub const MOBILE_USER_AGENT: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1";

pub const HTML_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Timeouts, identity, and retry policy for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub user_agent: String,
    /// Applied to every request that does not set its own timeout.
    pub default_timeout: Duration,
    pub connect_timeout: Duration,
    /// Additional attempts after the first failure for retriable errors.
    pub max_retries: u32,
    /// Base delay for exponential back-off: `backoff_base_ms * 2^(n-1)`.
    pub backoff_base_ms: u64,
}

impl TransportConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            default_timeout: Duration::from_secs(config.page_timeout_secs),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

/// HTTP client that looks like a browser and retries transient failures.
///
/// Attaches a realistic header set to every request, enforces a hard
/// timeout, and retries timeouts, connection failures, 429 and 5xx with
/// exponential back-off. After the last attempt the error is returned to
/// the caller. The transport holds no per-adapter state and is safe to share
/// across concurrent resolutions.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &TransportConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(config.default_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(default_headers())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self {
            client,
            max_retries: config.max_retries,
            backoff_base_ms: config.backoff_base_ms,
        })
    }

    /// Fetches `url` and returns the response body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] — `url` is not absolute (not retried).
    /// - [`ScraperError::RateLimited`] — HTTP 429 after all retries.
    /// - [`ScraperError::NotFound`] — HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`] — other non-2xx (5xx retried, 4xx not).
    /// - [`ScraperError::Http`] — network failure after all retries.
    pub async fn fetch_text(&self, url: &str, options: &FetchOptions) -> Result<String, ScraperError> {
        let url = build_url(url, &options.query)?;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let mut request = self.client.get(url.clone()).headers(options.headers.clone());
                if let Some(timeout) = options.timeout {
                    request = request.timeout(timeout);
                }

                let response = request.send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ScraperError::RateLimited {
                        url: url.to_string(),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound {
                        url: url.to_string(),
                    });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }

    /// Fetches `url` and decodes the body as JSON.
    ///
    /// Decode failures are not retried.
    ///
    /// # Errors
    ///
    /// Everything [`Self::fetch_text`] returns, plus
    /// [`ScraperError::Deserialize`] when the body is not valid JSON.
    pub async fn fetch_json(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> Result<serde_json::Value, ScraperError> {
        let body = self.fetch_text(url, options).await?;
        serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("response from {url}"),
            source: e,
        })
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(HTML_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(
        reqwest::header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers
}

/// Parses `raw` and appends `query` pairs, percent-encoding them.
fn build_url(raw: &str, query: &[(String, String)]) -> Result<Url, ScraperError> {
    let mut url = Url::parse(raw).map_err(|e| ScraperError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_appends_encoded_query() {
        let url = build_url(
            "https://www.tikwm.com/api/user/info",
            &[("unique_id".to_owned(), "a b&c".to_owned())],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.tikwm.com/api/user/info?unique_id=a+b%26c"
        );
    }

    #[test]
    fn build_url_keeps_existing_query() {
        let url = build_url(
            "https://i.instagram.com/api/v1/users/web_profile_info/?username=natgeo",
            &[],
        )
        .unwrap();
        assert_eq!(url.query(), Some("username=natgeo"));
    }

    #[test]
    fn build_url_rejects_relative_url() {
        let err = build_url("/natgeo/", &[]).unwrap_err();
        assert!(
            matches!(err, ScraperError::InvalidUrl { .. }),
            "expected InvalidUrl, got: {err:?}"
        );
    }

    #[test]
    fn transport_config_follows_app_config() {
        let app = AppConfig {
            page_timeout_secs: 12,
            max_retries: 5,
            retry_backoff_base_ms: 50,
            ..AppConfig::default()
        };
        let cfg = TransportConfig::from_app_config(&app);
        assert_eq!(cfg.default_timeout, Duration::from_secs(12));
        assert_eq!(cfg.max_retries, 5);
        assert_eq!(cfg.backoff_base_ms, 50);
    }
}
