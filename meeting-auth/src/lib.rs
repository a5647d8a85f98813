//! # meeting-auth
//!
//! Authentication and HTTP plumbing for the external providers used by the
//! meeting summarizer:
//! - API key authentication for AssemblyAI (`authorization: <key>`)
//! - Bearer token authentication for the Hugging Face Inference API
//! - HTTP client building with timeout and transient retry middleware
//! - Pre-configured provider endpoints
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meeting_auth::{
//!     api_key::{ApiKeyAuth, ApiKeyProvider},
//!     http::AuthenticatedClientBuilder,
//! };
//!
//! let client = AuthenticatedClientBuilder::new()
//!     .with_auth(Box::new(ApiKeyAuth::new(ApiKeyProvider::AssemblyAi, key)))
//!     .build()?;
//! ```

pub mod api_key;
pub mod error;
pub mod http;
pub mod providers;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
