use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use domain::events::Event;
use domain::pipeline::{Outcome, Pipeline};
use domain::{AudioAsset, AudioFormat, Error};
use log::*;
use service::{config::Config, logging::Logger};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logger: {e}");
    }

    info!(
        "Starting meeting_summarizer [{}] with model {}",
        config.runtime_env(),
        config.hf_summary_model
    );

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Cancelled) => {
            warn!("Cancelled");
            ExitCode::from(130)
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> Result<(), Error> {
    let path = config
        .audio_file
        .as_deref()
        .ok_or_else(|| Error::Configuration("no AUDIO_FILE given".to_string()))?;
    let asset = read_audio(path).await?;
    let pipeline = Arc::new(Pipeline::from_config(config)?);

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current request");
            interrupt.cancel();
        }
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = pipeline.spawn(asset, cancel, tx);
    while let Some(event) = rx.recv().await {
        render(&event);
    }

    let outcome = handle
        .await
        .map_err(|e| Error::Other(Box::new(e)))??;

    print_outcome(&outcome);
    if let Some(output) = &config.summary_output {
        write_summary(output, &outcome.summary).await?;
    }
    Ok(())
}

async fn read_audio(path: &Path) -> Result<AudioAsset, Error> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::Configuration(format!("invalid audio path {}", path.display())))?;

    if AudioFormat::from_filename(filename).is_none() {
        return Err(Error::Configuration(format!(
            "unsupported audio file {filename}: expected mp3, wav or m4a"
        )));
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        Error::Configuration(format!("failed to read {}: {e}", path.display()))
    })?;
    if bytes.is_empty() {
        return Err(Error::Configuration(format!("{filename} is empty")));
    }

    Ok(AudioAsset::new(bytes, filename))
}

fn render(event: &Event) {
    match event {
        Event::Uploading { filename, bytes } => info!("Uploading {filename} ({bytes} bytes)"),
        Event::Transcribing { job_id } => info!("Transcription job {job_id} started"),
        Event::Polling { attempt, status } => debug!("Poll {attempt}: {status}"),
        Event::Transcribed { characters } => info!("Transcript ready ({characters} characters)"),
        Event::Summarizing(progress) => info!(
            "Summarized chunk {}/{} ({:.0}%)",
            progress.completed,
            progress.total,
            progress.fraction() * 100.0
        ),
        Event::Summarized { characters } => info!("Summary ready ({characters} characters)"),
    }
}

fn print_outcome(outcome: &Outcome) {
    println!("Transcript\n==========\n{}\n", outcome.transcript_preview());
    println!("Summary\n=======\n{}", outcome.summary);
}

async fn write_summary(output: &Path, summary: &str) -> Result<(), Error> {
    tokio::fs::write(output, summary).await.map_err(|e| {
        Error::Configuration(format!("failed to write {}: {e}", output.display()))
    })?;
    info!("Summary written to {}", output.display());
    Ok(())
}
