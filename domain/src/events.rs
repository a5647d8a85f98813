//! Progress events emitted while a recording moves through the pipeline.
//!
//! Events are observational only; a dropped receiver never affects the run.

use meeting_ai::{Progress, Status};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Uploading { filename: String, bytes: usize },
    Transcribing { job_id: String },
    Polling { attempt: u32, status: Status },
    Transcribed { characters: usize },
    Summarizing(Progress),
    Summarized { characters: usize },
}

/// Optional sink for pipeline events.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    sender: Option<UnboundedSender<Event>>,
}

impl Reporter {
    pub fn new(sender: UnboundedSender<Event>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// A reporter that discards every event.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: Event) {
        if let Some(sender) = &self.sender {
            // Receiver gone means nobody is rendering; keep going.
            let _ = sender.send(event);
        }
    }
}
