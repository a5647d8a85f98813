//! Meeting summarization workflow.
//!
//! A recording is uploaded to the transcription provider, the resulting transcript is
//! cut into chunks, each chunk is summarized by a hosted model, and the partial
//! summaries are merged into one. `pipeline::Pipeline` ties the stages together;
//! the `gateway` module holds the HTTP clients behind the `meeting_ai` provider traits.

pub use meeting_ai::{AudioAsset, AudioFormat, Error};

pub mod events;
pub mod gateway;
pub mod pipeline;
pub mod summarizer;
pub mod transcription;
