//! Types for transcription operations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Processing status of a speech-to-text transcription job.
///
/// Jobs typically progress Queued → Processing → Completed within minutes.
/// Poll at a fixed interval to monitor progress; avoid tight loops that waste API quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Queued,
    Processing,
    Completed,
    Error,
}

impl Status {
    /// Completed and Error are final; no further polling changes them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Completed | Status::Error)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Status::Queued => write!(f, "queued"),
            Status::Processing => write!(f, "processing"),
            Status::Completed => write!(f, "completed"),
            Status::Error => write!(f, "error"),
        }
    }
}

/// Snapshot of a transcription job as reported by the provider.
///
/// `text` populates only once status is Completed; `error` only when status is Error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: Status,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Audio container formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    M4a,
}

impl AudioFormat {
    /// Detect the format from a filename's extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = Path::new(filename).extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "wav" => Some(AudioFormat::Wav),
            "m4a" => Some(AudioFormat::M4a),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Wav => "audio/wav",
            AudioFormat::M4a => "audio/mp4",
        }
    }
}

/// A recording held in memory for one upload-transcribe cycle.
///
/// Owned by the calling flow and dropped once the provider has the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioAsset {
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl AudioAsset {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
        }
    }

    pub fn format(&self) -> Option<AudioFormat> {
        AudioFormat::from_filename(&self.filename)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Audio payloads can be hundreds of megabytes; never dump them into logs.
impl fmt::Debug for AudioAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioAsset")
            .field("filename", &self.filename)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_deserializes_lowercase() {
        let job: Job =
            serde_json::from_str(r#"{"id":"t1","status":"error","error":"bad audio"}"#).unwrap();
        assert_eq!(job.status, Status::Error);
        assert_eq!(job.error.as_deref(), Some("bad audio"));
        assert_eq!(job.text, None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!Status::Queued.is_terminal());
        assert!(!Status::Processing.is_terminal());
        assert!(Status::Completed.is_terminal());
        assert!(Status::Error.is_terminal());
    }

    #[test]
    fn test_audio_format_detection() {
        assert_eq!(AudioFormat::from_filename("standup.MP3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_filename("call.wav"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_filename("memo.m4a"), Some(AudioFormat::M4a));
        assert_eq!(AudioFormat::from_filename("notes.txt"), None);
        assert_eq!(AudioFormat::from_filename("no_extension"), None);
    }

    #[test]
    fn test_audio_asset_debug_hides_bytes() {
        let asset = AudioAsset::new(vec![0u8; 1024], "meeting.wav");
        assert_eq!(
            format!("{:?}", asset),
            r#"AudioAsset { filename: "meeting.wav", bytes: 1024 }"#
        );
    }
}
