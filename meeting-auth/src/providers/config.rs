//! Pre-configured provider settings.

use std::time::Duration;

use crate::api_key::ApiKeyProvider;

/// Default AssemblyAI v2 API base URL.
pub const DEFAULT_ASSEMBLYAI_BASE_URL: &str = "https://api.assemblyai.com/v2";

/// Default Hugging Face Inference API base URL.
pub const DEFAULT_HUGGING_FACE_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Provider configuration with endpoints and settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider identifier.
    pub provider: ApiKeyProvider,
    /// Base API URL, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Transient retries handled by the HTTP middleware.
    pub max_retries: u32,
}

impl ProviderConfig {
    /// Point the provider at a different base URL (mock servers, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Get AssemblyAI configuration.
///
/// Transient failures are retried by the middleware.
pub fn assemblyai_config() -> ProviderConfig {
    ProviderConfig {
        provider: ApiKeyProvider::AssemblyAi,
        base_url: DEFAULT_ASSEMBLYAI_BASE_URL.to_string(),
        timeout: Duration::from_secs(60),
        max_retries: 3,
    }
}

/// Get Hugging Face Inference API configuration.
///
/// Middleware retries are off; callers own their retry budget for model calls.
pub fn hugging_face_config() -> ProviderConfig {
    ProviderConfig {
        provider: ApiKeyProvider::HuggingFace,
        base_url: DEFAULT_HUGGING_FACE_BASE_URL.to_string(),
        timeout: Duration::from_secs(90),
        max_retries: 0,
    }
}
