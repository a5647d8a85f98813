//! API key authentication for service providers.
//!
//! Provides the trait and implementations for authenticating requests to the
//! transcription (AssemblyAI) and summarization (Hugging Face) services.

mod auth;
mod bearer;

pub use auth::{ApiKeyAuth, ApiKeyProvider, ProviderAuth};
pub use bearer::BearerTokenAuth;
