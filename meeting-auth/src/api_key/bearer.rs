//! Standard Bearer token authentication.

use reqwest_middleware::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

use super::{ApiKeyProvider, ProviderAuth};
use crate::error::{api_key_error, ApiKeyErrorKind, Error};

/// Standard Bearer token authentication.
///
/// Uses the standard `Authorization: Bearer <token>` header pattern.
pub struct BearerTokenAuth {
    provider: ApiKeyProvider,
    token: SecretString,
}

impl BearerTokenAuth {
    /// Create a new Bearer token authenticator.
    pub fn new(provider: ApiKeyProvider, token: SecretString) -> Self {
        Self { provider, token }
    }
}

impl ProviderAuth for BearerTokenAuth {
    fn provider(&self) -> ApiKeyProvider {
        self.provider
    }

    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.token.expose_secret())
    }

    fn validate(&self) -> Result<(), Error> {
        let token = self.token.expose_secret();
        if token.trim().is_empty() {
            return Err(api_key_error(
                ApiKeyErrorKind::Missing,
                &format!("empty bearer token for {}", self.provider.as_str()),
            ));
        }
        if token.chars().any(char::is_control) {
            return Err(api_key_error(
                ApiKeyErrorKind::InvalidFormat,
                "bearer token contains control characters",
            ));
        }
        Ok(())
    }
}
