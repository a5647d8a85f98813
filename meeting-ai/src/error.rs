//! Error types for meeting AI operations.

use std::fmt;

/// Universal error type that abstracts provider-specific errors into common variants.
///
/// Provider implementations map their native errors to these variants, preserving
/// context while keeping the pipeline provider-agnostic. Transcription variants are
/// fatal to a run; summarization variants are absorbed by the extractive fallback.
#[derive(Debug)]
pub enum Error {
    /// The audio upload was rejected by the transcription provider.
    Upload(String),

    /// The provider refused to create a transcription job for the uploaded audio.
    JobCreation(String),

    /// The transcription job finished in the provider's error state.
    /// Carries the provider-reported message verbatim.
    Transcription(String),

    /// The transcription job completed without any text.
    EmptyTranscript,

    /// API key authentication failures. Credentials are invalid or lack permissions.
    Authentication(String),

    /// Network connectivity issues, DNS failures, or connection resets.
    /// These errors are typically transient and may benefit from retry logic.
    Network(String),

    /// Invalid parameters, missing credentials, or malformed configuration.
    Configuration(String),

    /// Provider returned a non-success status not covered by another variant.
    Provider(String),

    /// Provider answered successfully but with a body of an unrecognized shape.
    UnexpectedResponse(String),

    /// A request or the overall polling budget exceeded its time limit.
    Timeout(String),

    /// The run was cancelled by the caller.
    Cancelled,

    /// Provider rate limit exceeded. Clients must wait before retrying.
    RateLimited { retry_after_seconds: u64 },

    /// Failed to deserialize a provider response into the expected type.
    Deserialization(String),

    /// Catch-all for errors that don't fit other categories.
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// True for failures raised below HTTP: connection faults and request timeouts.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Timeout(_))
    }

    /// True for errors that stop the upload-transcribe flow.
    pub fn is_transcription_failure(&self) -> bool {
        matches!(
            self,
            Error::Upload(_)
                | Error::JobCreation(_)
                | Error::Transcription(_)
                | Error::EmptyTranscript
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Upload(msg) => write!(f, "Upload failed: {}", msg),
            Error::JobCreation(msg) => write!(f, "Transcription job creation failed: {}", msg),
            Error::Transcription(msg) => write!(f, "Transcription failed: {}", msg),
            Error::EmptyTranscript => write!(f, "Transcription returned empty text"),
            Error::Authentication(msg) => write!(f, "Authentication failed: {}", msg),
            Error::Network(msg) => write!(f, "Network error: {}", msg),
            Error::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::Provider(msg) => write!(f, "Provider error: {}", msg),
            Error::UnexpectedResponse(msg) => write!(f, "Unexpected response: {}", msg),
            Error::Timeout(msg) => write!(f, "Timeout: {}", msg),
            Error::Cancelled => write!(f, "Cancelled"),
            Error::RateLimited {
                retry_after_seconds,
            } => {
                write!(f, "Rate limited: retry after {}s", retry_after_seconds)
            }
            Error::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
            Error::Other(err) => write!(f, "Other error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<meeting_auth::Error> for Error {
    fn from(err: meeting_auth::Error) -> Self {
        Error::Configuration(err.to_string())
    }
}
