//! Shared data types passed between providers and the pipeline.

pub mod summary;
pub mod transcription;
