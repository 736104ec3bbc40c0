//! Spherical camera geometry.
//!
//! Axis convention: azimuth 0 looks from +Z, azimuth 90 from +X, and positive
//! elevation rotates the camera toward +Y. All angles are given in degrees.

use glam::Vec3;
use serde::Serialize;
use crate::angle::CameraAngle;
use crate::error::{CoreError, Result};

pub type Point3 = Vec3;

/// Radius of the preview widget, independent of the requested distance.
pub const VIS_RADIUS: f32 = 3.0;
pub const RING_SEGMENTS: usize = 64;
pub const ARC_FROM_DEG: f32 = -45.0;
pub const ARC_TO_DEG: f32 = 90.0;
pub const ARC_STEP_DEG: f32 = 5.0;
pub const MAX_ARC_POINTS: usize = 10_000;

/// Fraction of the camera-to-target vector drawn as the aim line.
const AIM_FRACTION: f32 = 0.2;

pub fn position(angle: CameraAngle, radius: f32) -> Point3 {
    position_degrees(angle.azimuth(), angle.elevation(), radius)
}

/// Same as [`position`] for raw angles that bypass [`CameraAngle`] bounds.
pub fn position_degrees(azimuth_deg: f32, elevation_deg: f32, radius: f32) -> Point3 {
    let az = azimuth_deg.to_radians();
    let el = elevation_deg.to_radians();
    Vec3::new(
        radius * el.cos() * az.sin(),
        radius * el.sin(),
        radius * el.cos() * az.cos(),
    )
}

/// Closed polyline on the `y = 0` plane. Returns `segments + 1` points and the
/// last point is the first one repeated.
pub fn orbit_ring(radius: f32, segments: usize) -> Result<Vec<Point3>> {
    if segments < 3 {
        return Err(CoreError::TooFewSegments(segments));
    }

    let mut points: Vec<Point3> = (0..segments)
        .map(|i| {
            let theta = (i as f32 / segments as f32) * std::f32::consts::TAU;
            Vec3::new(theta.cos() * radius, 0.0, theta.sin() * radius)
        })
        .collect();
    points.push(points[0]);

    Ok(points)
}

/// Polyline sweeping elevation at a fixed azimuth.
///
/// Samples `from + i * step` for every `i` that stays within `to`, so both
/// endpoints are present when the range divides evenly by the step.
pub fn elevation_arc(
    azimuth: f32,
    radius: f32,
    from_deg: f32,
    to_deg: f32,
    step_deg: f32,
) -> Result<Vec<Point3>> {
    let valid = from_deg.is_finite() && to_deg.is_finite() && step_deg.is_finite();
    if !valid || step_deg <= 0.0 || from_deg > to_deg {
        return Err(CoreError::InvalidSweep { from: from_deg, to: to_deg, step: step_deg });
    }

    // Tolerance keeps 90.0 in a -45..90 sweep despite float error in the division.
    let span = (to_deg - from_deg) / step_deg + 1e-4;
    if !span.is_finite() || span >= MAX_ARC_POINTS as f32 {
        return Err(CoreError::SweepTooDense { max: MAX_ARC_POINTS });
    }
    let steps = span.floor() as usize;

    Ok((0..=steps)
        .map(|i| position_degrees(azimuth, from_deg + i as f32 * step_deg, radius))
        .collect())
}

/// Everything needed to draw the angle preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualizationGeometry {
    pub radius: f32,
    pub camera: Point3,
    pub ring_marker: Point3,
    pub aim: [Point3; 2],
    pub orbit_ring: Vec<Point3>,
    pub elevation_arc: Vec<Point3>,
}

impl VisualizationGeometry {
    pub fn from_angle(angle: CameraAngle) -> Self {
        Self::with_radius(angle, VIS_RADIUS)
    }

    pub fn with_radius(angle: CameraAngle, radius: f32) -> Self {
        let camera = position(angle, radius);
        let ring_marker = position_degrees(angle.azimuth(), 0.0, radius);

        // Constants are known-good, so these never hit the error path.
        let orbit_ring = orbit_ring(radius, RING_SEGMENTS).unwrap_or_default();
        let elevation_arc =
            elevation_arc(angle.azimuth(), radius, ARC_FROM_DEG, ARC_TO_DEG, ARC_STEP_DEG)
                .unwrap_or_default();

        Self {
            radius,
            camera,
            ring_marker,
            aim: [camera, camera - camera * AIM_FRACTION],
            orbit_ring,
            elevation_arc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_axis_convention() {
        let front = position(CameraAngle::new(0.0, 0.0, 1.0), 1.0);
        assert!(front.abs_diff_eq(Vec3::Z, EPS));

        let right = position(CameraAngle::new(90.0, 0.0, 1.0), 1.0);
        assert!(right.abs_diff_eq(Vec3::X, EPS));

        let back = position(CameraAngle::new(180.0, 0.0, 1.0), 2.0);
        assert!(back.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), EPS));

        let up = position(CameraAngle::new(0.0, 60.0, 1.0), 1.0);
        assert!(up.y > 0.8);
    }

    #[test]
    fn test_ring_rejects_degenerate_segments() {
        assert_eq!(orbit_ring(3.0, 2), Err(CoreError::TooFewSegments(2)));
        assert_eq!(orbit_ring(3.0, 3).unwrap().len(), 4);
    }

    #[test]
    fn test_ring_is_closed_circle() {
        let ring = orbit_ring(3.0, RING_SEGMENTS).unwrap();
        assert_eq!(ring.len(), RING_SEGMENTS + 1);
        assert_eq!(ring.first(), ring.last());
        for p in &ring {
            assert_eq!(p.y, 0.0);
            assert!(((p.x * p.x + p.z * p.z) - 9.0).abs() < EPS * 10.0);
        }
    }

    #[test]
    fn test_arc_uneven_range_stops_before_end() {
        let arc = elevation_arc(0.0, 1.0, 0.0, 12.0, 5.0).unwrap();
        assert_eq!(arc.len(), 3);
        let last = arc.last().unwrap();
        assert!((last.y - 10f32.to_radians().sin()).abs() < EPS);
    }

    #[test]
    fn test_arc_rejects_bad_sweeps() {
        assert!(elevation_arc(0.0, 1.0, 10.0, 0.0, 5.0).is_err());
        assert!(elevation_arc(0.0, 1.0, 0.0, 10.0, 0.0).is_err());
        assert!(elevation_arc(0.0, 1.0, 0.0, 10.0, -5.0).is_err());
        assert!(elevation_arc(0.0, 1.0, f32::NAN, 10.0, 5.0).is_err());
    }

    #[test]
    fn test_arc_refuses_oversized_sweeps() {
        let too_dense = Err(CoreError::SweepTooDense { max: MAX_ARC_POINTS });
        assert_eq!(elevation_arc(0.0, 1.0, 0.0, 1e30, 1.0), too_dense);
        assert_eq!(elevation_arc(0.0, 1.0, 0.0, 1e9, 1e-3), too_dense);
        assert_eq!(elevation_arc(0.0, 1.0, -f32::MAX, f32::MAX, 1.0), too_dense);

        let arc = elevation_arc(0.0, 1.0, 0.0, 9_998.0, 1.0).unwrap();
        assert_eq!(arc.len(), 9_999);
    }

    #[test]
    fn test_arc_single_point_when_from_equals_to() {
        let arc = elevation_arc(45.0, 1.0, 30.0, 30.0, 5.0).unwrap();
        assert_eq!(arc.len(), 1);
    }

    #[test]
    fn test_geometry_follows_angle() {
        let angle = CameraAngle::new(90.0, 30.0, 2.0);
        let geo = VisualizationGeometry::from_angle(angle);

        assert_eq!(geo.radius, VIS_RADIUS);
        assert!(geo.camera.abs_diff_eq(position(angle, VIS_RADIUS), EPS));
        assert!(geo.ring_marker.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), EPS));
        assert_eq!(geo.orbit_ring.len(), RING_SEGMENTS + 1);
        assert_eq!(geo.elevation_arc.len(), 28);
        assert!(geo.aim[1].abs_diff_eq(geo.camera * 0.8, EPS));

        // the arc lies in the plane of the current azimuth
        for p in &geo.elevation_arc {
            assert!(p.z.abs() < EPS);
        }
    }

    #[test]
    fn test_distance_does_not_scale_preview() {
        let near = VisualizationGeometry::from_angle(CameraAngle::new(30.0, 10.0, 0.5));
        let far = VisualizationGeometry::from_angle(CameraAngle::new(30.0, 10.0, 2.0));
        assert_eq!(near, far);
    }
}
