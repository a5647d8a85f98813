//! Provider traits implemented by the gateways in `domain`.

pub mod summarization;
pub mod transcription;
