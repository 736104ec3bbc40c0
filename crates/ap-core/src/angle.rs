use std::ops::RangeInclusive;
use serde::{Deserialize, Serialize};

pub const ELEVATION_RANGE: RangeInclusive<f32> = -30.0..=60.0;
pub const DISTANCE_RANGE: RangeInclusive<f32> = 0.5..=2.0;

/// A camera placement around the subject.
///
/// Azimuth is kept in `[0, 360)` degrees, elevation and distance are clamped
/// to [`ELEVATION_RANGE`] and [`DISTANCE_RANGE`]. Every constructor goes through
/// [`CameraAngle::new`], so a value of this type is always in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAngle", into = "RawAngle")]
pub struct CameraAngle {
    azimuth: f32,
    elevation: f32,
    distance: f32,
}

impl CameraAngle {
    pub fn new(azimuth: f32, elevation: f32, distance: f32) -> Self {
        Self {
            azimuth: normalize_azimuth(azimuth),
            elevation: clamp_or(elevation, ELEVATION_RANGE, 0.0),
            distance: clamp_or(distance, DISTANCE_RANGE, 1.0),
        }
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn with_azimuth(self, azimuth: f32) -> Self {
        Self::new(azimuth, self.elevation, self.distance)
    }

    pub fn with_elevation(self, elevation: f32) -> Self {
        Self::new(self.azimuth, elevation, self.distance)
    }

    pub fn with_distance(self, distance: f32) -> Self {
        Self::new(self.azimuth, self.elevation, distance)
    }
}

impl Default for CameraAngle {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// Wraps any finite angle into `[0, 360)`. Non-finite input maps to 0.
pub fn normalize_azimuth(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

fn clamp_or(value: f32, range: RangeInclusive<f32>, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}

#[derive(Serialize, Deserialize)]
struct RawAngle {
    azimuth: f32,
    elevation: f32,
    distance: f32,
}

impl From<RawAngle> for CameraAngle {
    fn from(raw: RawAngle) -> Self {
        Self::new(raw.azimuth, raw.elevation, raw.distance)
    }
}

impl From<CameraAngle> for RawAngle {
    fn from(angle: CameraAngle) -> Self {
        Self {
            azimuth: angle.azimuth,
            elevation: angle.elevation,
            distance: angle.distance,
        }
    }
}
