//! Client configuration.
//!
//! [`ClientConfig`] is the one place where credentials, environment,
//! timeouts and TLS policy are decided. The client turns it into a fixed set
//! of default headers and a configured `reqwest::Client` once, at
//! construction.

use std::time::Duration;

use http::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use url::Url;

use crate::constants::{
    ACCEPT_MEDIA_TYPE, AUTHORIZATION_SCHEME, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT,
};
use crate::environment::Environment;
use crate::error::ProxyPayError;

/// Configuration for [`ProxyPayClient`](crate::ProxyPayClient).
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use proxypay::{ClientConfig, Environment};
///
/// let config = ClientConfig::new("my-api-key")
///     .with_environment(Environment::Production)
///     .with_timeout(Duration::from_secs(30));
/// assert_eq!(config.base_url()?.as_str(), "https://api.proxypay.co.ao/");
/// # Ok::<(), proxypay::ProxyPayError>(())
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    environment: Environment,
    base_url: Option<Url>,
    connect_timeout: Duration,
    timeout: Duration,
    accept_invalid_certs: bool,
}

impl ClientConfig {
    /// Creates a sandbox configuration with default timeouts.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            environment: Environment::default(),
            base_url: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }

    /// Selects the API environment.
    #[must_use]
    pub const fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Overrides the base URL derived from the environment.
    ///
    /// Intended for proxies and local test servers.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the overall request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables TLS certificate verification when `accept` is `true`.
    ///
    /// This makes the client vulnerable to man-in-the-middle attacks. Only
    /// enable it against the sandbox when its certificate chain cannot be
    /// validated locally.
    #[must_use]
    pub const fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the selected environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the overall request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns whether TLS certificate verification is disabled.
    #[must_use]
    pub const fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    /// Returns the effective base URL, always ending with a single `/` so
    /// endpoint paths can be joined onto it.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyPayError::Config`] if the URL cannot be re-parsed after
    /// normalization.
    pub fn base_url(&self) -> Result<Url, ProxyPayError> {
        let raw = self
            .base_url
            .as_ref()
            .map_or_else(|| self.environment.base_url().to_owned(), Url::to_string);
        let mut normalized = raw.trim_end_matches('/').to_owned();
        normalized.push('/');
        Url::parse(&normalized).map_err(|e| ProxyPayError::Config {
            context: "Failed to parse base URL",
            message: e.to_string(),
        })
    }

    /// Builds the headers sent with every request.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyPayError::Config`] if the API key contains characters
    /// that are not valid in an HTTP header.
    pub fn default_headers(&self) -> Result<HeaderMap, ProxyPayError> {
        let mut authorization =
            HeaderValue::from_str(&format!("{AUTHORIZATION_SCHEME} {}", self.api_key)).map_err(
                |e| ProxyPayError::Config {
                    context: "Failed to build Authorization header",
                    message: e.to_string(),
                },
            )?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_MEDIA_TYPE));
        Ok(headers)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}
