//! Per-request overrides for [`super::HttpTransport`].

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Header overrides, query parameters, and timeout for a single fetch.
///
/// Headers set here replace the transport's defaults of the same name.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub(super) headers: HeaderMap,
    pub(super) query: Vec<(String, String)>,
    pub(super) timeout: Option<Duration>,
}

impl FetchOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing any earlier value for the same name.
    ///
    /// Values that are not valid header text are skipped with a warning.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(v) => {
                self.headers.insert(name, v);
            }
            Err(e) => {
                tracing::warn!(header = %name, error = %e, "skipping invalid header value");
            }
        }
        self
    }

    /// Sets a non-standard header such as `sec-fetch-mode` or `x-ig-app-id`.
    #[must_use]
    pub fn custom_header(self, name: &'static str, value: &str) -> Self {
        self.header(HeaderName::from_static(name), value)
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
