pub mod error;
pub mod events;
pub mod generator;
pub mod job;
pub mod request;
pub mod source_image;

pub use error::{GenerationError, RequestKind};
pub use events::{GenEvent, ImageState, VideoState};
pub use generator::{Generator, ImageResult, PollSettings, VideoResult};
pub use request::{ImageRequest, VideoRequest};
