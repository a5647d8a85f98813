//! Transcription provider trait.

use crate::types::transcription::{AudioAsset, Job};
use crate::Error;
use async_trait::async_trait;

/// Abstraction for speech-to-text transcription services.
///
/// A transcription runs as an asynchronous provider job: upload the audio, create
/// the job, then poll it until it reaches a terminal status.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Upload raw audio bytes and return the opaque handle the provider issues for them.
    ///
    /// A non-success response maps to `Error::Upload`.
    async fn upload(&self, asset: &AudioAsset) -> std::result::Result<String, Error>;

    /// Start an async transcription job for previously uploaded audio.
    ///
    /// Returns immediately with the job id; a non-success response maps to
    /// `Error::JobCreation`.
    async fn create_transcription(&self, upload_url: &str) -> std::result::Result<Job, Error>;

    /// Retrieve job status and, once completed, its text.
    ///
    /// Poll until status is Completed or Error. Rate limit polling to avoid quota waste.
    async fn get_transcription(&self, job_id: &str) -> std::result::Result<Job, Error>;

    /// Return unique identifier for this provider (e.g., "assemblyai").
    ///
    /// Must be lowercase, alphanumeric with underscores only.
    fn provider_id(&self) -> &'static str;

    /// Validate API credentials by making a lightweight request.
    async fn verify_credentials(&self) -> std::result::Result<bool, Error>;
}
