use std::fmt;
use thiserror::Error;

/// Which of the two independent request paths an error or event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Image,
    Video,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => f.write_str("single image"),
            Self::Video => f.write_str("360° video"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Could not reach the backend: {0}")]
    Transport(String),

    #[error("Backend returned HTTP {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Unexpected response from backend: {0}")]
    Parse(String),

    #[error("Generation job failed: {0}")]
    JobFailed(String),

    #[error("Job did not finish after {attempts} status checks")]
    Timeout { attempts: u32 },

    #[error("A {0} request is already in progress")]
    InFlight(RequestKind),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Server { status: status.as_u16(), body: err.to_string() }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
