use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("an orbit ring needs at least 3 segments, got {0}")]
    TooFewSegments(usize),

    #[error("invalid elevation sweep {from}..={to} step {step}")]
    InvalidSweep { from: f32, to: f32, step: f32 },

    #[error("elevation sweep would need more than {max} points")]
    SweepTooDense { max: usize },
}

pub type Result<T> = std::result::Result<T, CoreError>;
