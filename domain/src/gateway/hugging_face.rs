//! Hugging Face Inference API client for summarization.
//!
//! One `summarize` call is one HTTP request; retries and the fallback summary
//! belong to `crate::summarizer`.

use async_trait::async_trait;
use log::*;
use meeting_ai::traits::summarization::Provider;
use meeting_ai::{Error, Parameters};
use meeting_auth::api_key::{ApiKeyProvider, BearerTokenAuth};
use meeting_auth::http::{AuthenticatedClient, AuthenticatedClientBuilder};
use meeting_auth::providers::ProviderConfig;
use reqwest::StatusCode;
use secrecy::SecretString;
use serde::Serialize;
use serde_json::Value;

use super::{body_error, error_body, transport_error};

const PROVIDER_ID: &str = "huggingface";

/// Body of an inference request
#[derive(Debug, Serialize)]
pub struct InferenceRequest<'a> {
    pub inputs: &'a str,
    pub parameters: &'a Parameters,
}

/// Hugging Face Inference API client bound to one model
pub struct HuggingFaceClient {
    client: AuthenticatedClient,
    base_url: String,
    model_id: String,
}

impl HuggingFaceClient {
    pub fn new(api_key: SecretString, model_id: &str, config: &ProviderConfig) -> Result<Self, Error> {
        if model_id.trim().is_empty() {
            return Err(Error::Configuration(
                "summary model id must not be empty".to_string(),
            ));
        }

        let auth = BearerTokenAuth::new(ApiKeyProvider::HuggingFace, api_key);
        let client = AuthenticatedClientBuilder::new()
            .with_auth(Box::new(auth))
            .with_timeout(config.timeout)
            .with_max_retries(config.max_retries)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model_id: model_id.to_string(),
        })
    }
}

/// Pull the summary out of a successful inference response.
///
/// Summarization pipelines answer `[{"summary_text": ...}]`; text-generation
/// models answer `{"generated_text": ...}`.
pub fn extract_summary(body: &Value) -> Option<String> {
    match body {
        Value::Array(items) => items
            .first()
            .and_then(|item| item.get("summary_text"))
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::Object(map) => map
            .get("generated_text")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn retry_after_seconds(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl Provider for HuggingFaceClient {
    async fn summarize(&self, text: &str, parameters: &Parameters) -> Result<String, Error> {
        let url = format!("{}/models/{}", self.base_url, self.model_id);

        trace!(
            "Requesting summary of {} characters from {}",
            text.chars().count(),
            self.model_id
        );

        let response = self
            .client
            .post(&url)
            .json(&InferenceRequest {
                inputs: text,
                parameters,
            })
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_ID, e))?;

        match response.status() {
            StatusCode::OK => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| body_error(PROVIDER_ID, e))?;
                let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
                    warn!("Failed to parse Hugging Face response: {:?}", e);
                    Error::Deserialization(format!("Invalid response from Hugging Face: {}", e))
                })?;
                extract_summary(&body).ok_or_else(|| {
                    Error::UnexpectedResponse(format!(
                        "no summary_text or generated_text in response from {}",
                        self.model_id
                    ))
                })
            }
            StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimited {
                retry_after_seconds: retry_after_seconds(&response),
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(Error::Authentication(error_body(response).await))
            }
            _ => {
                let error_text = error_body(response).await;
                debug!("Hugging Face API: {}", error_text);
                Err(Error::Provider(error_text))
            }
        }
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    fn provider_id(&self) -> &'static str {
        PROVIDER_ID
    }
}
