//! HTTP gateways to the external transcription and summarization providers.

pub mod assembly_ai;
pub mod hugging_face;

use log::*;
use meeting_ai::Error;

/// Map a failed send (before any HTTP status exists) to a transport error.
pub(crate) fn transport_error(provider: &str, err: reqwest_middleware::Error) -> Error {
    warn!("{} request failed: {:?}", provider, err);
    match err {
        reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => {
            Error::Timeout(format!("{} request timed out: {}", provider, e))
        }
        other => Error::Network(format!("{}: {}", provider, other)),
    }
}

/// Map a failure while reading a response body to a transport error.
pub(crate) fn body_error(provider: &str, err: reqwest::Error) -> Error {
    warn!("{} response body could not be read: {:?}", provider, err);
    if err.is_timeout() {
        Error::Timeout(format!("{} response timed out: {}", provider, err))
    } else {
        Error::Network(format!("{}: {}", provider, err))
    }
}

/// Read the body of a non-success response for error reporting.
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    if text.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, text)
    }
}
