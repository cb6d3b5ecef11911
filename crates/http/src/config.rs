use std::fmt::Debug;

/// The credential the bundled service accepts out of the box.
pub const DEFAULT_API_KEY: &str = "ai-service-secret-token";

/// Where the service listens when it runs locally.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Builder for [`HttpConfig`].
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct HttpConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl HttpConfigBuilder {
    /// Creates a builder with the given API key.
    #[inline]
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: None,
        }
    }

    /// Sets a custom base URL.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> HttpConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        HttpConfig {
            api_key: self
                .api_key
                .unwrap_or_else(|| DEFAULT_API_KEY.to_string()),
            // Endpoints always start with a slash.
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Debug for HttpConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfigBuilder")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Configuration for the HTTP transport.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HttpConfig {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
}

impl HttpConfig {
    /// Returns the base URL that endpoints are appended to.
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for HttpConfig {
    #[inline]
    fn default() -> Self {
        HttpConfigBuilder::default().build()
    }
}

impl Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
