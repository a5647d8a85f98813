//! Summarization provider trait.

use crate::types::summary::Parameters;
use crate::Error;
use async_trait::async_trait;

/// Abstraction for hosted summarization models.
///
/// One call is one attempt: implementations do not retry. Callers own the retry
/// budget and the fallback when every attempt fails.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Summarize `text` with the given generation parameters.
    ///
    /// Transport faults map to `Error::Network` or `Error::Timeout`; non-success
    /// statuses to `Error::Provider`; a success body of unknown shape to
    /// `Error::UnexpectedResponse`.
    async fn summarize(
        &self,
        text: &str,
        parameters: &Parameters,
    ) -> std::result::Result<String, Error>;

    /// Identifier of the model answering requests (e.g., "sshleifer/distilbart-cnn-12-6").
    fn model_id(&self) -> String;

    /// Return unique identifier for this provider (e.g., "huggingface").
    fn provider_id(&self) -> &'static str;
}
