//! Upload a recording, start a transcription job and wait for its text.
//!
//! Any failure here ends the run: without a transcript there is nothing to summarize.

use std::time::Duration;

use log::*;
use meeting_ai::traits::transcription::Provider;
use meeting_ai::{AudioAsset, Error, Job, Status};
use service::config::Config;
use tokio_util::sync::CancellationToken;

use crate::events::{Event, Reporter};

/// Bounds on how long to wait for a transcription job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 120,
        }
    }
}

impl From<&Config> for PollSettings {
    fn from(config: &Config) -> Self {
        Self {
            interval: config.poll_interval(),
            max_attempts: config.max_poll_attempts.max(1),
        }
    }
}

/// Transcribe `asset` and return the full transcript text.
///
/// The asset is consumed and dropped as soon as the provider has accepted the upload.
pub async fn transcribe(
    provider: &dyn Provider,
    asset: AudioAsset,
    settings: &PollSettings,
    cancel: &CancellationToken,
    reporter: &Reporter,
) -> Result<String, Error> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    reporter.emit(Event::Uploading {
        filename: asset.filename.clone(),
        bytes: asset.len(),
    });
    let upload_url = provider.upload(&asset).await?;
    drop(asset);

    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let job = provider.create_transcription(&upload_url).await?;
    reporter.emit(Event::Transcribing {
        job_id: job.id.clone(),
    });

    let job = wait_for_completion(provider, &job.id, settings, cancel, reporter).await?;
    transcript_text(job)
}

/// Poll `job_id` at a fixed interval until it reaches a terminal status.
///
/// Fails with `Error::Timeout` after `max_attempts` non-terminal polls and with
/// `Error::Cancelled` as soon as the token fires, including mid-wait.
pub async fn wait_for_completion(
    provider: &dyn Provider,
    job_id: &str,
    settings: &PollSettings,
    cancel: &CancellationToken,
    reporter: &Reporter,
) -> Result<Job, Error> {
    for attempt in 1..=settings.max_attempts {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let job = provider.get_transcription(job_id).await?;
        debug!("Transcript {} poll {}: {}", job_id, attempt, job.status);
        reporter.emit(Event::Polling {
            attempt,
            status: job.status,
        });

        if job.status.is_terminal() {
            return Ok(job);
        }

        if attempt < settings.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(settings.interval) => {}
            }
        }
    }

    warn!(
        "Transcript {} still not finished after {} polls",
        job_id, settings.max_attempts
    );
    Err(Error::Timeout(format!(
        "transcript {} not finished after {} polls at {:?} intervals",
        job_id, settings.max_attempts, settings.interval
    )))
}

fn transcript_text(job: Job) -> Result<String, Error> {
    match job.status {
        Status::Completed => match job.text {
            Some(text) if !text.is_empty() => {
                info!("Transcript {} completed ({} characters)", job.id, text.chars().count());
                Ok(text)
            }
            _ => Err(Error::EmptyTranscript),
        },
        Status::Error => {
            let message = job.error.unwrap_or_else(|| "unknown error".to_string());
            error!("Transcript {} failed: {}", job.id, message);
            Err(Error::Transcription(message))
        }
        status => Err(Error::Provider(format!(
            "transcript {} is not finished ({})",
            job.id, status
        ))),
    }
}
