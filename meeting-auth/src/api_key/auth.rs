//! API key authentication trait and implementation.

use reqwest::header::HeaderValue;
use reqwest_middleware::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{api_key_error, ApiKeyErrorKind, Error};

/// Known API key providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyProvider {
    AssemblyAi,
    HuggingFace,
}

impl ApiKeyProvider {
    /// Get the provider identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiKeyProvider::AssemblyAi => "assemblyai",
            ApiKeyProvider::HuggingFace => "huggingface",
        }
    }
}

/// Trait for authenticating HTTP requests with API keys or bearer tokens.
///
/// Implementations handle provider-specific authentication patterns like:
/// - AssemblyAI: `authorization: xxx`
/// - Hugging Face: `Authorization: Bearer xxx`
pub trait ProviderAuth: Send + Sync {
    /// Get the provider identifier.
    fn provider(&self) -> ApiKeyProvider;

    /// Apply authentication to a request builder.
    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder;

    /// Check that the credential is usable before any request is made.
    fn validate(&self) -> Result<(), Error>;
}

/// Raw API key sent as the whole value of a provider header.
///
/// ```rust,ignore
/// // AssemblyAI: authorization: <key>
/// let auth = ApiKeyAuth::new(
///     ApiKeyProvider::AssemblyAi,
///     SecretString::new("api_key_here".to_string()),
/// );
/// ```
pub struct ApiKeyAuth {
    provider: ApiKeyProvider,
    api_key: SecretString,
    header_name: &'static str,
}

impl ApiKeyAuth {
    /// Create a new API key authenticator using the provider's default header.
    pub fn new(provider: ApiKeyProvider, api_key: SecretString) -> Self {
        let header_name = match provider {
            ApiKeyProvider::AssemblyAi => "authorization",
            ApiKeyProvider::HuggingFace => "Authorization",
        };

        Self {
            provider,
            api_key,
            header_name,
        }
    }

    fn header_value(&self) -> Result<HeaderValue, Error> {
        let mut value = HeaderValue::from_str(self.api_key.expose_secret()).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: crate::ErrorKind::ApiKey(ApiKeyErrorKind::InvalidFormat),
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl ProviderAuth for ApiKeyAuth {
    fn provider(&self) -> ApiKeyProvider {
        self.provider
    }

    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        match self.header_value() {
            Ok(value) => request.header(self.header_name, value),
            // validate() rejects keys that end up here
            Err(_) => request,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(api_key_error(
                ApiKeyErrorKind::Missing,
                &format!("empty API key for {}", self.provider.as_str()),
            ));
        }
        self.header_value().map(|_| ())
    }
}
