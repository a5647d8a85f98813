//! AssemblyAI API client for transcription services.
//!
//! This module provides an HTTP client for the AssemblyAI v2 API: raw audio upload,
//! transcript job creation and transcript status polling.

use async_trait::async_trait;
use log::*;
use meeting_ai::traits::transcription::Provider;
use meeting_ai::{AudioAsset, Error, Job};
use meeting_auth::api_key::{ApiKeyAuth, ApiKeyProvider};
use meeting_auth::http::{AuthenticatedClient, AuthenticatedClientBuilder};
use meeting_auth::providers::ProviderConfig;
use reqwest::StatusCode;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::{error_body, transport_error};

const PROVIDER_ID: &str = "assemblyai";

/// Response from uploading raw audio
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub upload_url: String,
}

/// Request to create a new transcription
#[derive(Debug, Serialize)]
pub struct CreateTranscriptRequest<'a> {
    pub audio_url: &'a str,
}

/// AssemblyAI API client
pub struct AssemblyAiClient {
    client: AuthenticatedClient,
    base_url: String,
}

impl AssemblyAiClient {
    /// Create a new AssemblyAI client with the given API key and provider settings
    pub fn new(api_key: SecretString, config: &ProviderConfig) -> Result<Self, Error> {
        let auth = ApiKeyAuth::new(ApiKeyProvider::AssemblyAi, api_key);
        let client = AuthenticatedClientBuilder::new()
            .with_auth(Box::new(auth))
            .with_timeout(config.timeout)
            .with_max_retries(config.max_retries)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl Provider for AssemblyAiClient {
    async fn upload(&self, asset: &AudioAsset) -> Result<String, Error> {
        let url = format!("{}/upload", self.base_url);

        debug!(
            "Uploading {} ({} bytes) to AssemblyAI",
            asset.filename,
            asset.len()
        );

        let content_type = asset
            .format()
            .map_or("application/octet-stream", |format| format.mime_type());

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(asset.bytes.clone())
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_ID, e))?;

        if response.status().is_success() {
            let upload: UploadResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse AssemblyAI upload response: {:?}", e);
                Error::Deserialization(format!("Invalid upload response from AssemblyAI: {}", e))
            })?;
            info!("Uploaded {} to AssemblyAI", asset.filename);
            Ok(upload.upload_url)
        } else {
            let error_text = error_body(response).await;
            error!("AssemblyAI upload: {}", error_text);
            Err(Error::Upload(error_text))
        }
    }

    async fn create_transcription(&self, upload_url: &str) -> Result<Job, Error> {
        let url = format!("{}/transcript", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&CreateTranscriptRequest {
                audio_url: upload_url,
            })
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_ID, e))?;

        if response.status().is_success() {
            let job: Job = response.json().await.map_err(|e| {
                warn!("Failed to parse AssemblyAI response: {:?}", e);
                Error::Deserialization(format!("Invalid response from AssemblyAI: {}", e))
            })?;
            info!("Created AssemblyAI transcript with ID: {}", job.id);
            Ok(job)
        } else {
            let error_text = error_body(response).await;
            error!("AssemblyAI transcript creation: {}", error_text);
            Err(Error::JobCreation(error_text))
        }
    }

    async fn get_transcription(&self, job_id: &str) -> Result<Job, Error> {
        let url = format!("{}/transcript/{}", self.base_url, job_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_ID, e))?;

        match response.status() {
            status if status.is_success() => response.json().await.map_err(|e| {
                warn!("Failed to parse AssemblyAI response: {:?}", e);
                Error::Deserialization(format!("Invalid response from AssemblyAI: {}", e))
            }),
            StatusCode::UNAUTHORIZED => Err(Error::Authentication(error_body(response).await)),
            _ => {
                let error_text = error_body(response).await;
                error!("AssemblyAI API: {}", error_text);
                Err(Error::Provider(error_text))
            }
        }
    }

    fn provider_id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn verify_credentials(&self) -> Result<bool, Error> {
        let url = format!("{}/transcript?limit=1", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_ID, e))?;

        // 200 means valid key (returns list of transcripts)
        // 401 means invalid key
        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meeting_ai::Status;
    use meeting_auth::providers::assemblyai_config;
    use mockito::{Matcher, Server, ServerGuard};
    use std::time::Duration;

    async fn setup() -> (ServerGuard, AssemblyAiClient) {
        let server = Server::new_async().await;
        let config = assemblyai_config()
            .with_base_url(&server.url())
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(0);
        let client =
            AssemblyAiClient::new(SecretString::new("aai_test_key".to_string()), &config)
                .unwrap();
        (server, client)
    }

    #[tokio::test]
    async fn test_upload_sends_raw_bytes_with_auth_header() {
        let (mut server, client) = setup().await;
        let mock = server
            .mock("POST", "/upload")
            .match_header("authorization", "aai_test_key")
            .match_header("content-type", "audio/wav")
            .match_body(Matcher::Exact("RIFFdata".to_string()))
            .with_status(200)
            .with_body(r#"{"upload_url":"https://cdn.assemblyai.com/upload/abc"}"#)
            .create_async()
            .await;

        let asset = AudioAsset::new(b"RIFFdata".to_vec(), "standup.wav");
        let upload_url = client.upload(&asset).await.unwrap();

        assert_eq!(upload_url, "https://cdn.assemblyai.com/upload/abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_content_type_follows_extension() {
        let (mut server, client) = setup().await;
        let m4a = server
            .mock("POST", "/upload")
            .match_header("content-type", "audio/mp4")
            .with_status(200)
            .with_body(r#"{"upload_url":"https://cdn.assemblyai.com/upload/m4a"}"#)
            .create_async()
            .await;

        client
            .upload(&AudioAsset::new(vec![0, 1], "Retro.M4A"))
            .await
            .unwrap();
        m4a.assert_async().await;

        let unknown = server
            .mock("POST", "/upload")
            .match_header("content-type", "application/octet-stream")
            .with_status(200)
            .with_body(r#"{"upload_url":"https://cdn.assemblyai.com/upload/raw"}"#)
            .create_async()
            .await;

        client
            .upload(&AudioAsset::new(vec![0, 1], "recording"))
            .await
            .unwrap();
        unknown.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_failure_is_upload_error() {
        let (mut server, client) = setup().await;
        let _mock = server
            .mock("POST", "/upload")
            .with_status(400)
            .with_body("file too large")
            .create_async()
            .await;

        let asset = AudioAsset::new(vec![1, 2, 3], "standup.mp3");
        match client.upload(&asset).await {
            Err(Error::Upload(msg)) => assert!(msg.contains("file too large")),
            other => panic!("Expected Upload error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_transcription_posts_audio_url() {
        let (mut server, client) = setup().await;
        let mock = server
            .mock("POST", "/transcript")
            .match_header("authorization", "aai_test_key")
            .match_body(Matcher::Json(serde_json::json!({
                "audio_url": "https://cdn.assemblyai.com/upload/abc"
            })))
            .with_status(200)
            .with_body(r#"{"id":"tr_1","status":"queued","audio_url":"ignored"}"#)
            .create_async()
            .await;

        let job = client
            .create_transcription("https://cdn.assemblyai.com/upload/abc")
            .await
            .unwrap();

        assert_eq!(job.id, "tr_1");
        assert_eq!(job.status, Status::Queued);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_transcription_failure_is_job_creation_error() {
        let (mut server, client) = setup().await;
        let _mock = server
            .mock("POST", "/transcript")
            .with_status(422)
            .with_body(r#"{"error":"audio_url is not reachable"}"#)
            .create_async()
            .await;

        let result = client.create_transcription("https://example.com/a.wav").await;
        assert!(matches!(result, Err(Error::JobCreation(_))));
    }

    #[tokio::test]
    async fn test_get_transcription_completed() {
        let (mut server, client) = setup().await;
        let _mock = server
            .mock("GET", "/transcript/tr_1")
            .with_status(200)
            .with_body(r#"{"id":"tr_1","status":"completed","text":"Hello team."}"#)
            .create_async()
            .await;

        let job = client.get_transcription("tr_1").await.unwrap();
        assert_eq!(job.status, Status::Completed);
        assert_eq!(job.text.as_deref(), Some("Hello team."));
    }

    #[tokio::test]
    async fn test_get_transcription_unauthorized() {
        let (mut server, client) = setup().await;
        let _mock = server
            .mock("GET", "/transcript/tr_1")
            .with_status(401)
            .with_body("Invalid API key")
            .create_async()
            .await;

        let result = client.get_transcription("tr_1").await;
        assert!(matches!(result, Err(Error::Authentication(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let config = assemblyai_config()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2))
            .with_max_retries(0);
        let client =
            AssemblyAiClient::new(SecretString::new("aai_test_key".to_string()), &config)
                .unwrap();

        let err = client.get_transcription("tr_1").await.unwrap_err();
        assert!(err.is_transport(), "expected transport error, got {:?}", err);
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let (mut server, client) = setup().await;
        let _mock = server
            .mock("GET", "/transcript")
            .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
            .with_status(401)
            .create_async()
            .await;

        assert!(!client.verify_credentials().await.unwrap());
    }

    #[test]
    fn test_blank_api_key_is_configuration_error() {
        let result = AssemblyAiClient::new(SecretString::new(String::new()), &assemblyai_config());
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
