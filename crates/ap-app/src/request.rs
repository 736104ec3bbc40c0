use std::ops::RangeInclusive;
use ap_core::{prompt, BackgroundStyle, CameraAngle};

pub const VIDEO_FPS: u32 = 24;
pub const DURATION_RANGE: RangeInclusive<f32> = 1.0..=10.0;
pub const DEFAULT_DURATION: f32 = 3.0;

/// Inputs for a single still image at the chosen angle.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub angle: CameraAngle,
    /// Source image as a data URL or bare base64.
    pub image: Option<String>,
    pub background: BackgroundStyle,
}

impl ImageRequest {
    pub fn new(angle: CameraAngle) -> Self {
        Self {
            angle,
            image: None,
            background: BackgroundStyle::default(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_background(mut self, background: BackgroundStyle) -> Self {
        self.background = background;
        self
    }

    /// Prompt the backend is expected to construct for this request.
    pub fn prompt_preview(&self) -> String {
        prompt::single_image_prompt(self.angle, self.background)
    }
}

/// Inputs for a 360° turntable video. Only elevation and distance of the
/// angle are used, the backend sweeps the azimuth itself.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRequest {
    pub angle: CameraAngle,
    duration: f32,
    pub image: Option<String>,
    pub background: BackgroundStyle,
}

impl VideoRequest {
    pub fn new(angle: CameraAngle, duration: f32) -> Self {
        Self {
            angle,
            duration: clamp_duration(duration),
            image: None,
            background: BackgroundStyle::default(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_background(mut self, background: BackgroundStyle) -> Self {
        self.background = background;
        self
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn fps(&self) -> u32 {
        VIDEO_FPS
    }

    pub fn frame_count(&self) -> u32 {
        (self.duration * VIDEO_FPS as f32).round() as u32
    }

    /// Per-frame prompts in turntable order.
    pub fn frame_prompts(&self) -> Vec<String> {
        prompt::turntable_azimuths(self.frame_count())
            .into_iter()
            .map(|az| prompt::video_frame_prompt(self.angle.with_azimuth(az), self.background))
            .collect()
    }
}

fn clamp_duration(seconds: f32) -> f32 {
    if seconds.is_finite() {
        seconds.clamp(*DURATION_RANGE.start(), *DURATION_RANGE.end())
    } else {
        DEFAULT_DURATION
    }
}
