//! Meeting AI abstraction layer for transcription and summarization providers.
//!
//! This crate provides trait-based abstractions for the meeting summary workflow:
//! - Speech-to-text transcription of an uploaded recording
//! - Model-backed summarization of transcript text
//!
//! The design is provider-agnostic, so the pipeline can swap AssemblyAI or the
//! Hugging Face Inference API for other services without changing its own code.
//! Enable the `mock` feature to get `mockall` doubles of both provider traits.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::Error;
pub use types::summary::{ChunkSummary, Parameters, Progress, SummaryOrigin, TextChunk};
pub use types::transcription::{AudioAsset, AudioFormat, Job, Status};
