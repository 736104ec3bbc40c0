pub mod angle;
pub mod error;
pub mod prompt;
pub mod spherical;
mod background;

pub use angle::CameraAngle;
pub use background::BackgroundStyle;
pub use spherical::{Point3, VisualizationGeometry};
