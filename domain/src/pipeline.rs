//! End-to-end run: audio in, transcript and summary out.

use std::sync::Arc;

use log::*;
use meeting_ai::traits::summarization::{self, Provider as _};
use meeting_ai::traits::transcription::{self, Provider as _};
use meeting_ai::{AudioAsset, Error};
use meeting_auth::providers::{assemblyai_config, hugging_face_config};
use service::config::Config;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{Event, Reporter};
use crate::gateway::assembly_ai::AssemblyAiClient;
use crate::gateway::hugging_face::HuggingFaceClient;
use crate::summarizer::{Summarizer, SummarizerSettings};
use crate::transcription::{transcribe, PollSettings};

/// Characters of transcript shown before truncation.
pub const TRANSCRIPT_PREVIEW_CHARS: usize = 3000;

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub transcript: String,
    pub summary: String,
}

impl Outcome {
    /// The transcript cut to `TRANSCRIPT_PREVIEW_CHARS`, with `…` appended when cut.
    pub fn transcript_preview(&self) -> String {
        match self.transcript.char_indices().nth(TRANSCRIPT_PREVIEW_CHARS) {
            Some((offset, _)) => format!("{}…", &self.transcript[..offset]),
            None => self.transcript.clone(),
        }
    }
}

pub struct Pipeline {
    transcriber: Arc<dyn transcription::Provider>,
    summarizer: Summarizer,
    poll: PollSettings,
}

impl Pipeline {
    pub fn new(
        transcriber: Arc<dyn transcription::Provider>,
        summary_provider: Arc<dyn summarization::Provider>,
        summarizer_settings: &SummarizerSettings,
        poll: PollSettings,
    ) -> Self {
        Self {
            transcriber,
            summarizer: Summarizer::new(summary_provider, summarizer_settings),
            poll,
        }
    }

    /// Build a pipeline wired to AssemblyAI and the Hugging Face Inference API.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let assemblyai_key = config.assemblyai_api_key().ok_or_else(|| {
            Error::Configuration("ASSEMBLYAI_API_KEY is not set".to_string())
        })?;
        let huggingface_key = config.huggingface_api_key().ok_or_else(|| {
            Error::Configuration("HUGGINGFACE_API_KEY is not set".to_string())
        })?;

        let transcription_config = assemblyai_config()
            .with_base_url(config.assemblyai_base_url())
            .with_timeout(config.transcription_timeout());
        let summarization_config = hugging_face_config()
            .with_base_url(config.huggingface_base_url())
            .with_timeout(config.summarization_timeout());

        let transcriber = AssemblyAiClient::new(assemblyai_key, &transcription_config)?;
        let summary_provider = HuggingFaceClient::new(
            huggingface_key,
            &config.hf_summary_model,
            &summarization_config,
        )?;

        info!(
            "Transcribing with {} at {}, summarizing with {} model {}",
            transcriber.provider_id(),
            transcription_config.base_url,
            summary_provider.provider_id(),
            summary_provider.model_id()
        );

        Ok(Self::new(
            Arc::new(transcriber),
            Arc::new(summary_provider),
            &SummarizerSettings::from(config),
            PollSettings::from(config),
        ))
    }

    /// Transcribe `asset`, then summarize the transcript.
    ///
    /// Transcription failures end the run before any summarization request is made.
    pub async fn run(
        &self,
        asset: AudioAsset,
        cancel: &CancellationToken,
        reporter: &Reporter,
    ) -> Result<Outcome, Error> {
        let transcript =
            transcribe(self.transcriber.as_ref(), asset, &self.poll, cancel, reporter).await?;
        reporter.emit(Event::Transcribed {
            characters: transcript.chars().count(),
        });

        let summary = self.summarizer.summarize(&transcript, cancel, reporter).await?;
        reporter.emit(Event::Summarized {
            characters: summary.chars().count(),
        });

        Ok(Outcome {
            transcript,
            summary,
        })
    }

    /// Run on a background task, streaming events to `events`.
    ///
    /// The channel closes when the task finishes.
    pub fn spawn(
        self: Arc<Self>,
        asset: AudioAsset,
        cancel: CancellationToken,
        events: UnboundedSender<Event>,
    ) -> JoinHandle<Result<Outcome, Error>> {
        tokio::spawn(async move {
            let reporter = Reporter::new(events);
            let result = self.run(asset, &cancel, &reporter).await;
            match &result {
                Err(e) if e.is_transcription_failure() => error!("Transcription failed: {}", e),
                Err(e) => warn!("Pipeline run ended: {}", e),
                Ok(_) => debug!("Pipeline run complete"),
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meeting_ai::traits::summarization::MockProvider as MockSummaryProvider;
    use meeting_ai::traits::transcription::MockProvider as MockTranscriptionProvider;
    use meeting_ai::{Job, Status};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn finished(status: Status, text: Option<&str>, error: Option<&str>) -> Job {
        Job {
            id: "tr_9".to_string(),
            status,
            text: text.map(str::to_string),
            error: error.map(str::to_string),
        }
    }

    fn transcriber_returning(job: Job) -> MockTranscriptionProvider {
        let mut provider = MockTranscriptionProvider::new();
        provider
            .expect_upload()
            .times(1)
            .returning(|_| Ok("https://cdn/upload/9".to_string()));
        provider
            .expect_create_transcription()
            .times(1)
            .returning(|_| Ok(finished(Status::Queued, None, None)));
        provider
            .expect_get_transcription()
            .times(1)
            .returning(move |_| Ok(job.clone()));
        provider
    }

    fn pipeline(
        transcriber: MockTranscriptionProvider,
        summary_provider: MockSummaryProvider,
    ) -> Pipeline {
        let settings = SummarizerSettings {
            retry_delay: Duration::ZERO,
            transport_retry_delay: Duration::ZERO,
            ..SummarizerSettings::default()
        };
        let poll = PollSettings {
            interval: Duration::from_millis(1),
            max_attempts: 5,
        };
        Pipeline::new(
            Arc::new(transcriber),
            Arc::new(summary_provider),
            &settings,
            poll,
        )
    }

    fn asset() -> AudioAsset {
        AudioAsset::new(vec![7u8; 32], "retro.m4a")
    }

    #[tokio::test]
    async fn test_run_transcribes_then_summarizes() {
        let transcriber =
            transcriber_returning(finished(Status::Completed, Some("We agreed to ship."), None));
        let mut summary_provider = MockSummaryProvider::new();
        summary_provider
            .expect_summarize()
            .withf(|text, _| text == "We agreed to ship.")
            .times(1)
            .returning(|_, _| Ok("Ship it.".to_string()));

        let outcome = pipeline(transcriber, summary_provider)
            .run(asset(), &CancellationToken::new(), &Reporter::disabled())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome {
                transcript: "We agreed to ship.".to_string(),
                summary: "Ship it.".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_empty_transcript_skips_summarization() {
        let transcriber = transcriber_returning(finished(Status::Completed, Some(""), None));
        let mut summary_provider = MockSummaryProvider::new();
        summary_provider.expect_summarize().never();

        let result = pipeline(transcriber, summary_provider)
            .run(asset(), &CancellationToken::new(), &Reporter::disabled())
            .await;

        assert!(matches!(result, Err(Error::EmptyTranscript)));
    }

    #[tokio::test]
    async fn test_transcription_error_skips_summarization() {
        let transcriber =
            transcriber_returning(finished(Status::Error, None, Some("unsupported codec")));
        let mut summary_provider = MockSummaryProvider::new();
        summary_provider.expect_summarize().never();

        let result = pipeline(transcriber, summary_provider)
            .run(asset(), &CancellationToken::new(), &Reporter::disabled())
            .await;

        match result {
            Err(Error::Transcription(msg)) => assert_eq!(msg, "unsupported codec"),
            other => panic!("Expected Transcription error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawn_streams_events_and_returns_outcome() {
        let transcriber =
            transcriber_returning(finished(Status::Completed, Some("Short call."), None));
        let mut summary_provider = MockSummaryProvider::new();
        summary_provider
            .expect_summarize()
            .times(1)
            .returning(|_, _| Ok("Brief.".to_string()));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = Arc::new(pipeline(transcriber, summary_provider)).spawn(
            asset(),
            CancellationToken::new(),
            tx,
        );

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        let outcome = handle.await.unwrap().unwrap();

        assert_eq!(outcome.summary, "Brief.");
        assert!(matches!(events.first(), Some(Event::Uploading { .. })));
        assert!(events.contains(&Event::Transcribed { characters: 11 }));
        assert_eq!(events.last(), Some(&Event::Summarized { characters: 6 }));
    }

    #[test]
    fn test_transcript_preview_truncates_long_text() {
        let outcome = Outcome {
            transcript: "é".repeat(TRANSCRIPT_PREVIEW_CHARS + 5),
            summary: String::new(),
        };
        let preview = outcome.transcript_preview();
        assert_eq!(preview.chars().count(), TRANSCRIPT_PREVIEW_CHARS + 1);
        assert!(preview.ends_with('…'));

        let short = Outcome {
            transcript: "short".to_string(),
            summary: String::new(),
        };
        assert_eq!(short.transcript_preview(), "short");
    }

    #[test]
    fn test_from_config_builds_both_gateways() {
        let config = Config::from_args([
            "meeting_summarizer",
            "call.mp3",
            "--assemblyai-api-key",
            "aai_key",
            "--huggingface-api-key",
            "hf_key",
        ])
        .unwrap();
        assert!(Pipeline::from_config(&config).is_ok());
    }

    #[test]
    fn test_from_config_rejects_blank_key() {
        let config = Config::from_args([
            "meeting_summarizer",
            "call.mp3",
            "--assemblyai-api-key",
            "aai_key",
            "--huggingface-api-key",
            "",
        ])
        .unwrap();
        assert!(matches!(
            Pipeline::from_config(&config),
            Err(Error::Configuration(_))
        ));
    }
}
