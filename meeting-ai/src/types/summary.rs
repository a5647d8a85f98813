//! Types for chunked summarization.

use serde::{Deserialize, Serialize};

/// Generation parameters sent with every summarization request.
///
/// Defaults match a deterministic abstractive summary of 60 to 250 tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            max_length: 250,
            min_length: 60,
            do_sample: false,
        }
    }
}

/// Contiguous slice of a transcript, at most `chunk_size` characters long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub index: usize,
    pub text: String,
}

impl TextChunk {
    /// Length in characters, the unit chunk sizes are measured in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Where a chunk summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryOrigin {
    /// Produced by the inference provider.
    Model,
    /// Extracted locally after the retry budget ran out.
    Fallback,
}

/// Summary of one TextChunk, in the chunk's position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSummary {
    pub index: usize,
    pub text: String,
    pub origin: SummaryOrigin,
}

impl ChunkSummary {
    pub fn is_fallback(&self) -> bool {
        self.origin == SummaryOrigin::Fallback
    }
}

/// Observational progress signal emitted after each chunk is summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Completed share in `0.0..=1.0`; an empty run counts as done.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}
