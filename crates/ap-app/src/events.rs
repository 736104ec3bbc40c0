use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use crate::error::GenerationError;
use crate::job::JobStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum GenEvent {
    Image(ImageState),
    Video(VideoState),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ImageState {
    #[default]
    Idle,
    Requesting,
    Succeeded {
        result: String,
        constructed_prompt: String,
    },
    Failed(GenerationError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum VideoState {
    #[default]
    Idle,
    Submitting,
    /// One per non-terminal status answer, `attempt` counts from 1.
    Polling {
        job_id: String,
        attempt: u32,
        status: JobStatus,
    },
    Succeeded {
        video_url: String,
    },
    Failed(GenerationError),
}

impl ImageState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed(_))
    }
}

impl VideoState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed(_))
    }
}

pub type EventSender = UnboundedSender<GenEvent>;
pub type EventReceiver = UnboundedReceiver<GenEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
