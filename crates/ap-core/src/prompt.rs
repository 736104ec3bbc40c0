//! Prompt text derived from a camera angle.
//!
//! Mirrors the wording the generation backend builds on its side, so clients
//! can preview the constructed prompt before a request completes.

use crate::angle::{normalize_azimuth, CameraAngle};
use crate::background::BackgroundStyle;

pub const TRIGGER_TOKEN: &str = "<sks>";

/// Sector start (degrees) and keyword, in ascending order.
const AZIMUTH_SECTORS: [(f32, &str); 9] = [
    (0.0, "front view"),
    (22.5, "front-right quarter view"),
    (67.5, "right side view"),
    (112.5, "back-right quarter view"),
    (157.5, "back view"),
    (202.5, "back-left quarter view"),
    (247.5, "left side view"),
    (292.5, "front-left quarter view"),
    (337.5, "front view"),
];

pub fn azimuth_keyword(azimuth: f32) -> &'static str {
    let az = normalize_azimuth(azimuth);
    AZIMUTH_SECTORS
        .iter()
        .rev()
        .find(|(start, _)| az >= *start)
        .map_or("front view", |(_, kw)| *kw)
}

pub fn elevation_keyword(elevation: f32) -> &'static str {
    if elevation <= -15.0 {
        "low-angle shot"
    } else if elevation >= 45.0 {
        "high-angle shot"
    } else if elevation >= 15.0 {
        "elevated shot"
    } else {
        "eye-level shot"
    }
}

pub fn distance_keyword(distance: f32) -> &'static str {
    if distance < 0.8 {
        "close-up"
    } else if distance > 1.2 {
        "wide shot"
    } else {
        "medium shot"
    }
}

pub fn angle_keywords(angle: CameraAngle) -> String {
    format!(
        "{} {} {}",
        azimuth_keyword(angle.azimuth()),
        elevation_keyword(angle.elevation()),
        distance_keyword(angle.distance()),
    )
}

/// Prompt for a single still image, with the head-locking clauses.
pub fn single_image_prompt(angle: CameraAngle, background: BackgroundStyle) -> String {
    format!(
        "{TRIGGER_TOKEN} {}, consistent pose, static action, no pose change, \
         fixed head position, head facing relative to body, not looking at camera{}",
        angle_keywords(angle),
        background.prompt_suffix(),
    )
}

/// Prompt for one frame of a turntable video.
pub fn video_frame_prompt(angle: CameraAngle, background: BackgroundStyle) -> String {
    format!(
        "{TRIGGER_TOKEN} {} consistent pose, static action, no pose change{}",
        angle_keywords(angle),
        background.prompt_suffix(),
    )
}

/// Azimuth of every frame in a full turn of `frame_count` frames.
pub fn turntable_azimuths(frame_count: u32) -> Vec<f32> {
    if frame_count == 0 {
        return Vec::new();
    }
    let step = 360.0 / frame_count as f32;
    (0..frame_count).map(|i| i as f32 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_azimuth_sectors() {
        assert_eq!(azimuth_keyword(0.0), "front view");
        assert_eq!(azimuth_keyword(22.4), "front view");
        assert_eq!(azimuth_keyword(22.5), "front-right quarter view");
        assert_eq!(azimuth_keyword(90.0), "right side view");
        assert_eq!(azimuth_keyword(180.0), "back view");
        assert_eq!(azimuth_keyword(270.0), "left side view");
        assert_eq!(azimuth_keyword(300.0), "front-left quarter view");
        assert_eq!(azimuth_keyword(337.5), "front view");
        assert_eq!(azimuth_keyword(-90.0), "left side view");
    }

    #[test]
    fn test_elevation_and_distance_keywords() {
        assert_eq!(elevation_keyword(-30.0), "low-angle shot");
        assert_eq!(elevation_keyword(0.0), "eye-level shot");
        assert_eq!(elevation_keyword(20.0), "elevated shot");
        assert_eq!(elevation_keyword(60.0), "high-angle shot");
        assert_eq!(distance_keyword(0.5), "close-up");
        assert_eq!(distance_keyword(1.0), "medium shot");
        assert_eq!(distance_keyword(2.0), "wide shot");
    }

    #[test]
    fn test_single_image_prompt() {
        let prompt = single_image_prompt(CameraAngle::new(90.0, 0.0, 1.0), BackgroundStyle::WhiteStudio);
        assert!(prompt.starts_with("<sks> right side view eye-level shot medium shot, consistent pose"));
        assert!(prompt.contains("not looking at camera, solid white background"));
    }

    #[test]
    fn test_video_frame_prompt_without_background() {
        let prompt = video_frame_prompt(CameraAngle::default(), BackgroundStyle::Default);
        assert_eq!(
            prompt,
            "<sks> front view eye-level shot medium shot consistent pose, static action, no pose change"
        );
    }

    #[test]
    fn test_turntable_covers_full_turn() {
        let az = turntable_azimuths(72);
        assert_eq!(az.len(), 72);
        assert_eq!(az[0], 0.0);
        assert!((az[71] - 355.0).abs() < 1e-3);
        assert!(turntable_azimuths(0).is_empty());
    }
}
