//! Authenticated HTTP client builder with middleware.

use std::time::Duration;

use log::*;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::RetryTransientMiddleware;

use super::BackoffPolicy;
use crate::api_key::ProviderAuth;
use crate::error::{api_key_error, ApiKeyErrorKind, Error};

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout applied to every call made by the client.
    pub timeout: Duration,
    /// Maximum number of transient retries. Zero disables the retry middleware.
    pub max_retries: u32,
    /// First backoff delay of the retry middleware.
    pub retry_base_delay: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            user_agent: format!("meeting-summarizer/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client that authenticates every request it builds.
pub struct AuthenticatedClient {
    inner: ClientWithMiddleware,
    auth: Box<dyn ProviderAuth>,
}

impl AuthenticatedClient {
    /// Start an authenticated GET request.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.auth.authenticate(self.inner.get(url))
    }

    /// Start an authenticated POST request.
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.auth.authenticate(self.inner.post(url))
    }
}

/// Builder for creating authenticated HTTP clients with middleware.
///
/// Provides a fluent API for constructing HTTP clients with:
/// - Authentication (API keys, bearer tokens)
/// - Transient retry logic with exponential backoff
/// - Timeout configuration
pub struct AuthenticatedClientBuilder {
    config: HttpClientConfig,
    auth: Option<Box<dyn ProviderAuth>>,
}

impl AuthenticatedClientBuilder {
    /// Create a new client builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: HttpClientConfig::default(),
            auth: None,
        }
    }

    /// Set the authentication provider.
    pub fn with_auth(mut self, auth: Box<dyn ProviderAuth>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Set the first backoff delay used by the retry middleware.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.config.retry_base_delay = delay;
        self
    }

    /// Build the configured HTTP client.
    ///
    /// Fails when no credential was supplied or the credential is unusable.
    pub fn build(self) -> Result<AuthenticatedClient, Error> {
        let auth = self.auth.ok_or_else(|| {
            api_key_error(ApiKeyErrorKind::Missing, "no authentication configured")
        })?;
        auth.validate()?;

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(self.config.timeout)
            .user_agent(self.config.user_agent)
            .build()?;

        let mut builder = ClientBuilder::new(client);
        if self.config.max_retries > 0 {
            // Retries share one timeout's worth of wall-clock time.
            let retry_policy = BackoffPolicy::new(self.config.max_retries)
                .with_base_delay(self.config.retry_base_delay)
                .with_budget(self.config.timeout);
            builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
        }

        debug!(
            "Built {} client: timeout={:?}, max_retries={}",
            auth.provider().as_str(),
            self.config.timeout,
            self.config.max_retries
        );

        Ok(AuthenticatedClient {
            inner: builder.build(),
            auth,
        })
    }
}

impl Default for AuthenticatedClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
