use serde::{Deserialize, Serialize};
use ap_core::BackgroundStyle;
use crate::error::GenerationError;
use crate::job::JobStatus;
use crate::request::{ImageRequest, VideoRequest};

/// Body of `POST /generate`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateBody {
    pub azimuth: f32,
    pub elevation: f32,
    pub distance: f32,
    pub image: Option<String>,
    pub bg_style: BackgroundStyle,
}

impl From<&ImageRequest> for GenerateBody {
    fn from(req: &ImageRequest) -> Self {
        Self {
            azimuth: req.angle.azimuth(),
            elevation: req.angle.elevation(),
            distance: req.angle.distance(),
            image: req.image.clone(),
            bg_style: req.background,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    pub result: Option<String>,
    #[serde(default)]
    pub constructed_prompt: String,
}

/// Body of `POST /generate-360`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Generate360Body {
    pub duration: f32,
    pub fps: u32,
    pub elevation: f32,
    pub distance: f32,
    pub image: Option<String>,
    pub bg_style: BackgroundStyle,
}

impl From<&VideoRequest> for Generate360Body {
    fn from(req: &VideoRequest) -> Self {
        Self {
            duration: req.duration(),
            fps: req.fps(),
            elevation: req.angle.elevation(),
            distance: req.angle.distance(),
            image: req.image.clone(),
            bg_style: req.background,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobHandle {
    pub job_id: String,
    #[serde(default)]
    pub status: Option<JobStatus>,
}

/// The backend either renders synchronously and returns the URL, or hands out
/// a job to poll, optionally wrapped in a `{ success, data }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Generate360Response {
    Immediate {
        video_url: String,
        #[serde(default)]
        message: Option<String>,
    },
    Job(JobHandle),
    Envelope { data: JobHandle },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobStatusBody {
    pub status: JobStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "video_url")]
    pub result: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum JobStatusResponse {
    Flat(JobStatusBody),
    Envelope { data: JobStatusBody },
}

impl JobStatusResponse {
    pub fn into_body(self) -> JobStatusBody {
        match self {
            Self::Flat(body) | Self::Envelope { data: body } => body,
        }
    }
}

/// Returns the string if it has content, otherwise a parse error naming `what`.
pub(crate) fn non_empty(value: Option<String>, what: &str) -> Result<String, GenerationError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(GenerationError::Parse(format!("response did not contain {what}"))),
    }
}
