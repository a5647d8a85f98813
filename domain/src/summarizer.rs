//! Chunked summarization of arbitrarily long transcripts.
//!
//! The model behind `summarization::Provider` has an input ceiling, so the text is
//! cut into fixed-size chunks, each chunk is summarized on its own, and the partial
//! summaries are reduced to one in a merge pass. Model failures never escape: after
//! the retry budget runs out a chunk gets an extractive fallback instead.

use std::sync::Arc;
use std::time::Duration;

use log::*;
use meeting_ai::traits::summarization::Provider;
use meeting_ai::{ChunkSummary, Error, Parameters, Progress, SummaryOrigin, TextChunk};
use service::config::{Config, MergeStrategy};
use tokio_util::sync::CancellationToken;

use crate::events::{Event, Reporter};

/// Number of `". "`-delimited segments kept by the fallback summary.
const FALLBACK_SEGMENTS: usize = 5;
const FALLBACK_DELIMITER: &str = ". ";
const FALLBACK_MARKER: &str = "...";

/// Tuning for the chunked summarizer.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizerSettings {
    /// Maximum characters per chunk; 0 is treated as 1.
    pub chunk_size: usize,
    /// Model attempts per snippet before falling back.
    pub retries: u32,
    /// Wait after a non-success or unusable model response.
    pub retry_delay: Duration,
    /// Wait after a network fault or request timeout.
    pub transport_retry_delay: Duration,
    pub parameters: Parameters,
    pub merge_strategy: MergeStrategy,
    /// Re-chunking rounds allowed by `MergeStrategy::Recursive`.
    pub max_merge_depth: u32,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            chunk_size: 4000,
            retries: 3,
            retry_delay: Duration::from_secs(3),
            transport_retry_delay: Duration::from_secs(2),
            parameters: Parameters::default(),
            merge_strategy: MergeStrategy::SinglePass,
            max_merge_depth: 4,
        }
    }
}

impl From<&Config> for SummarizerSettings {
    fn from(config: &Config) -> Self {
        Self {
            chunk_size: config.chunk_size,
            retries: config.summary_retries,
            retry_delay: config.retry_delay(),
            transport_retry_delay: config.transport_retry_delay(),
            merge_strategy: config.merge_strategy,
            ..Self::default()
        }
    }
}

/// Split `text` into consecutive chunks of at most `chunk_size` characters.
///
/// Slicing is positional and ignores word boundaries. Concatenating the chunks in
/// order gives back `text` exactly. Empty input yields no chunks.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<TextChunk> {
    let size = chunk_size.max(1);
    let mut chunks = Vec::with_capacity(text.len() / size + 1);
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == size {
            chunks.push(TextChunk {
                index: chunks.len(),
                text: text[start..offset].to_string(),
            });
            start = offset;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(TextChunk {
            index: chunks.len(),
            text: text[start..].to_string(),
        });
    }

    chunks
}

/// Extractive summary used when the model cannot produce one.
///
/// Keeps the first five `". "`-delimited segments and marks the cut with `"..."`.
pub fn fallback_summary(snippet: &str) -> String {
    let head: Vec<&str> = snippet
        .split(FALLBACK_DELIMITER)
        .take(FALLBACK_SEGMENTS)
        .collect();
    format!("{}{}", head.join(FALLBACK_DELIMITER), FALLBACK_MARKER)
}

fn join_summaries(summaries: &[ChunkSummary]) -> String {
    summaries
        .iter()
        .map(|summary| summary.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Summarizes one snippet with a bounded number of model attempts.
pub struct ChunkSummarizer {
    provider: Arc<dyn Provider>,
    parameters: Parameters,
    retries: u32,
    retry_delay: Duration,
    transport_retry_delay: Duration,
}

impl ChunkSummarizer {
    pub fn new(provider: Arc<dyn Provider>, settings: &SummarizerSettings) -> Self {
        Self {
            provider,
            parameters: settings.parameters,
            retries: settings.retries,
            retry_delay: settings.retry_delay,
            transport_retry_delay: settings.transport_retry_delay,
        }
    }

    pub async fn summarize_chunk(
        &self,
        chunk: &TextChunk,
        cancel: &CancellationToken,
    ) -> ChunkSummary {
        let (text, origin) = self.summarize(&chunk.text, cancel).await;
        ChunkSummary {
            index: chunk.index,
            text,
            origin,
        }
    }

    /// Summarize `snippet`; always returns, falling back after `retries` failed attempts.
    ///
    /// Cancellation abandons the remaining attempts and returns the fallback.
    pub async fn summarize(
        &self,
        snippet: &str,
        cancel: &CancellationToken,
    ) -> (String, SummaryOrigin) {
        for attempt in 1..=self.retries {
            if cancel.is_cancelled() {
                break;
            }

            let result = tokio::select! {
                _ = cancel.cancelled() => None,
                result = self.provider.summarize(snippet, &self.parameters) => Some(result),
            };

            let delay = match result {
                None => break,
                Some(Ok(summary)) => return (summary, SummaryOrigin::Model),
                Some(Err(e)) if e.is_transport() => {
                    warn!("Summary attempt {}/{} failed: {}", attempt, self.retries, e);
                    self.transport_retry_delay
                }
                Some(Err(e)) => {
                    warn!("Summary attempt {}/{} rejected: {}", attempt, self.retries, e);
                    self.retry_delay
                }
            };

            if attempt < self.retries {
                let cancelled = tokio::select! {
                    _ = cancel.cancelled() => true,
                    _ = tokio::time::sleep(delay) => false,
                };
                if cancelled {
                    break;
                }
            }
        }

        info!(
            "Using extractive fallback for {} characters",
            snippet.chars().count()
        );
        (fallback_summary(snippet), SummaryOrigin::Fallback)
    }
}

/// Reduces arbitrarily long text to a single summary.
pub struct Summarizer {
    chunk_summarizer: ChunkSummarizer,
    chunk_size: usize,
    merge_strategy: MergeStrategy,
    max_merge_depth: u32,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn Provider>, settings: &SummarizerSettings) -> Self {
        Self {
            chunk_summarizer: ChunkSummarizer::new(provider, settings),
            chunk_size: settings.chunk_size.max(1),
            merge_strategy: settings.merge_strategy,
            max_merge_depth: settings.max_merge_depth,
        }
    }

    /// Summarize `text`, reporting `Event::Summarizing` after every chunk.
    ///
    /// The only error is `Error::Cancelled`; model failures degrade to the fallback.
    pub async fn summarize(
        &self,
        text: &str,
        cancel: &CancellationToken,
        reporter: &Reporter,
    ) -> Result<String, Error> {
        let chunks = chunk_text(text, self.chunk_size);
        if chunks.is_empty() {
            return Ok(String::new());
        }

        let total = chunks.len();
        info!("Summarizing {} chunk(s)", total);

        let summaries = self.summarize_chunks(&chunks, cancel, Some(reporter)).await?;
        let fallbacks = summaries.iter().filter(|s| s.is_fallback()).count();
        if fallbacks > 0 {
            warn!("{} of {} chunk summaries used the fallback", fallbacks, total);
        }

        let combined = join_summaries(&summaries);
        if total == 1 {
            return Ok(combined);
        }

        self.merge(combined, cancel).await
    }

    async fn summarize_chunks(
        &self,
        chunks: &[TextChunk],
        cancel: &CancellationToken,
        reporter: Option<&Reporter>,
    ) -> Result<Vec<ChunkSummary>, Error> {
        let total = chunks.len();
        let mut summaries = Vec::with_capacity(total);

        for chunk in chunks {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            summaries.push(self.chunk_summarizer.summarize_chunk(chunk, cancel).await);
            if let Some(reporter) = reporter {
                reporter.emit(Event::Summarizing(Progress {
                    completed: summaries.len(),
                    total,
                }));
            }
        }

        // A cancel during the last chunk leaves a fallback in place of a real summary.
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(summaries)
    }

    async fn merge(&self, combined: String, cancel: &CancellationToken) -> Result<String, Error> {
        let mut combined = combined;

        if self.merge_strategy == MergeStrategy::Recursive {
            let mut depth = 0;
            while combined.chars().count() > self.chunk_size && depth < self.max_merge_depth {
                let parts = chunk_text(&combined, self.chunk_size);
                debug!(
                    "Merge round {}: reducing {} partial summaries",
                    depth + 1,
                    parts.len()
                );
                let reduced = self.summarize_chunks(&parts, cancel, None).await?;
                combined = join_summaries(&reduced);
                depth += 1;
            }
        }

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        debug!("Merge pass over {} characters", combined.chars().count());
        let (summary, origin) = self.chunk_summarizer.summarize(&combined, cancel).await;
        if origin == SummaryOrigin::Fallback && cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(summary)
    }
}
