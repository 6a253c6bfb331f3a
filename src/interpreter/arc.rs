//! Arc Geometry Resolver
//!
//! Turns a G2/G3 move into center, radius, sweep and start offset. Two input
//! forms are accepted:
//!
//! - center offsets `I`/`J` (`K` is read but arcs stay in the XY plane)
//! - a radius `R`, whose center is one of the two points on the chord's
//!   perpendicular bisector, picked by the arc direction
//!
//! Every angle is in degrees.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::{ArcGeometry, Point3};

use super::state::PositioningMode;

/// Distances below this are treated as zero
const EPSILON: f64 = 1e-9;

/// Rotation sense of an arc move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcDirection {
    /// G2
    Clockwise,
    /// G3
    CounterClockwise,
}

/// How `I`/`J` are read while in absolute positioning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArcCenterMode {
    /// Absolute point under G90, start-relative offset under G91
    #[default]
    FollowPositioning,
    /// Always an offset from the arc's start point
    Relative,
}

/// Raw arc words of a move, unscaled
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArcParams {
    pub i: Option<f64>,
    pub j: Option<f64>,
    pub k: Option<f64>,
    pub r: Option<f64>,
}

impl ArcParams {
    pub fn has_offsets(&self) -> bool {
        self.i.is_some() || self.j.is_some() || self.k.is_some()
    }
}

/// Why an arc could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ArcFault {
    #[error("arc has neither I/J/K center offsets nor an R radius")]
    MissingGeometry,
    #[error("radius-form arc needs distinct start and end points")]
    ZeroChord,
    #[error("arc radius is zero")]
    ZeroRadius,
    #[error("arc endpoint lies on its center")]
    EndAtCenter,
}

/// A resolved arc plus any advisory findings
#[derive(Debug, Clone, PartialEq)]
pub struct ArcResolution {
    pub geometry: ArcGeometry,
    pub warnings: Vec<String>,
}

/// Resolves arc moves under fixed interpreter settings
#[derive(Debug, Clone, Copy)]
pub struct ArcResolver {
    /// Source units to scene units
    pub scale: f64,
    pub centers: ArcCenterMode,
    /// Allowed difference between start and end radius, in scene units
    pub radius_tolerance: f64,
}

impl ArcResolver {
    /// Resolve an arc from `start` to `end` (both already in scene units)
    pub fn resolve(
        &self,
        start: Point3,
        end: Point3,
        direction: ArcDirection,
        params: &ArcParams,
        mode: PositioningMode,
    ) -> Result<ArcResolution, ArcFault> {
        let mut warnings = Vec::new();
        let start_xy = start.truncate();
        let end_xy = end.truncate();

        let center_xy = match params.r {
            Some(r) => {
                if params.has_offsets() {
                    warnings.push("arc has both R and I/J/K words; using R".to_string());
                }
                self.radius_center(start_xy, end_xy, r, direction, &mut warnings)?
            }
            None if params.has_offsets() => self.offset_center(start_xy, params, mode),
            None => return Err(ArcFault::MissingGeometry),
        };

        let to_start = start_xy - center_xy;
        let to_end = end_xy - center_xy;
        let radius = to_start.length();
        let end_radius = to_end.length();

        if radius <= EPSILON {
            return Err(ArcFault::ZeroRadius);
        }
        if end_radius <= EPSILON {
            return Err(ArcFault::EndAtCenter);
        }

        if (radius - end_radius).abs() > self.radius_tolerance {
            warnings.push(format!(
                "arc start radius {:.6} and end radius {:.6} differ",
                radius, end_radius
            ));
        }

        let sweep = if start_xy.distance(end_xy) <= EPSILON {
            360.0
        } else {
            sweep_magnitude(to_start, to_end, direction)
        };
        let (sweep_angle, half_turns) = match direction {
            ArcDirection::CounterClockwise => (sweep, 180.0),
            ArcDirection::Clockwise => (-sweep, 360.0),
        };
        let polar = to_start.y.atan2(to_start.x).to_degrees();

        let dz = end.z - start.z;
        let height_per_turn = if sweep > 0.0 { dz * 360.0 / sweep } else { 0.0 };

        Ok(ArcResolution {
            geometry: ArcGeometry {
                center: center_xy.extend(start.z),
                radius,
                sweep_angle,
                start_offset_angle: normalize_degrees(polar + half_turns),
                height_per_turn,
            },
            warnings,
        })
    }

    fn offset_center(&self, start: DVec2, params: &ArcParams, mode: PositioningMode) -> DVec2 {
        let offset = DVec2::new(params.i.unwrap_or(0.0), params.j.unwrap_or(0.0)) * self.scale;
        let relative = match self.centers {
            ArcCenterMode::Relative => true,
            ArcCenterMode::FollowPositioning => mode == PositioningMode::Incremental,
        };

        if relative { start + offset } else { offset }
    }

    fn radius_center(
        &self,
        start: DVec2,
        end: DVec2,
        signed_radius: f64,
        direction: ArcDirection,
        warnings: &mut Vec<String>,
    ) -> Result<DVec2, ArcFault> {
        let radius = (signed_radius * self.scale).abs();
        let chord = start.distance(end);

        if chord <= EPSILON {
            return Err(ArcFault::ZeroChord);
        }
        if radius <= EPSILON {
            return Err(ArcFault::ZeroRadius);
        }

        let half_chord = chord / 2.0;
        let rise = radius * radius - half_chord * half_chord;
        let rise = if rise < 0.0 {
            warnings.push(format!(
                "arc radius {:.6} is shorter than half the chord {:.6}; centering on the chord",
                radius, half_chord
            ));
            0.0
        } else {
            rise.sqrt()
        };

        // The side of the chord depends only on direction; the sign of R is dropped
        let normal = DVec2::new(start.y - end.y, end.x - start.x) / chord;
        let side = match direction {
            ArcDirection::CounterClockwise => 1.0,
            ArcDirection::Clockwise => -1.0,
        };

        Ok((start + end) / 2.0 + normal * (rise * side))
    }
}

/// Unsigned sweep from `to_start` to `to_end` travelling in `direction`
///
/// The inverse cosine gives the short way round, which is replaced by its
/// complement when the commanded direction runs the long way.
fn sweep_magnitude(to_start: DVec2, to_end: DVec2, direction: ArcDirection) -> f64 {
    let cos = to_start.dot(to_end) / (to_start.length() * to_end.length());
    let short = cos.clamp(-1.0, 1.0).acos().to_degrees();
    let cross = to_start.perp_dot(to_end);

    if cross.abs() <= EPSILON {
        return short;
    }

    let short_is_ccw = cross > 0.0;
    match (direction, short_is_ccw) {
        (ArcDirection::CounterClockwise, false) | (ArcDirection::Clockwise, true) => 360.0 - short,
        _ => short,
    }
}

/// Wrap an angle into `[0, 360)`
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOLVER: ArcResolver = ArcResolver {
        scale: 1.0,
        centers: ArcCenterMode::FollowPositioning,
        radius_tolerance: 1e-6,
    };

    fn offsets(i: f64, j: f64) -> ArcParams {
        ArcParams {
            i: Some(i),
            j: Some(j),
            ..Default::default()
        }
    }

    fn radius(r: f64) -> ArcParams {
        ArcParams {
            r: Some(r),
            ..Default::default()
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_quarter_turn_counter_clockwise() {
        let arc = RESOLVER
            .resolve(
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                ArcDirection::CounterClockwise,
                &offsets(-1.0, 0.0),
                PositioningMode::Incremental,
            )
            .unwrap()
            .geometry;

        assert_eq!(arc.center, Point3::ZERO);
        assert_close(arc.radius, 1.0);
        assert_close(arc.sweep_angle, 90.0);
        assert_close(arc.start_offset_angle, 180.0);
    }

    #[test]
    fn test_clockwise_long_way_round() {
        let arc = RESOLVER
            .resolve(
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                ArcDirection::Clockwise,
                &offsets(-1.0, 0.0),
                PositioningMode::Incremental,
            )
            .unwrap()
            .geometry;

        assert_close(arc.sweep_angle, -270.0);
        assert_close(arc.start_offset_angle, 0.0);
        assert!(arc.end_point().distance(Point3::new(0.0, 1.0, 0.0)) < 1e-9);
    }

    #[test]
    fn test_full_circle() {
        let arc = RESOLVER
            .resolve(
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 2.0),
                ArcDirection::Clockwise,
                &offsets(-1.0, 0.0),
                PositioningMode::Incremental,
            )
            .unwrap()
            .geometry;

        assert_close(arc.sweep_angle, -360.0);
        assert_close(arc.height_per_turn, 2.0);
    }

    #[test]
    fn test_absolute_mode_reads_center_as_point() {
        let arc = RESOLVER
            .resolve(
                Point3::new(3.0, 2.0, 0.0),
                Point3::new(2.0, 3.0, 0.0),
                ArcDirection::CounterClockwise,
                &offsets(2.0, 2.0),
                PositioningMode::Absolute,
            )
            .unwrap()
            .geometry;

        assert_eq!(arc.center, Point3::new(2.0, 2.0, 0.0));
        assert_close(arc.sweep_angle, 90.0);
    }

    #[test]
    fn test_relative_centers_ignore_positioning() {
        let resolver = ArcResolver {
            centers: ArcCenterMode::Relative,
            ..RESOLVER
        };
        let arc = resolver
            .resolve(
                Point3::new(3.0, 2.0, 0.0),
                Point3::new(2.0, 3.0, 0.0),
                ArcDirection::CounterClockwise,
                &offsets(-1.0, 0.0),
                PositioningMode::Absolute,
            )
            .unwrap()
            .geometry;

        assert_eq!(arc.center, Point3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn test_radius_form_sides() {
        let start = Point3::ZERO;
        let end = Point3::new(2.0, 0.0, 0.0);
        let rise = 3.0_f64.sqrt();

        let resolve = |direction| {
            RESOLVER
                .resolve(start, end, direction, &radius(2.0), PositioningMode::Absolute)
                .unwrap()
                .geometry
        };
        let ccw = resolve(ArcDirection::CounterClockwise);
        let cw = resolve(ArcDirection::Clockwise);

        assert!(ccw.center.distance(Point3::new(1.0, rise, 0.0)) < 1e-9);
        assert!(cw.center.distance(Point3::new(1.0, -rise, 0.0)) < 1e-9);
        assert_close(ccw.sweep_angle, 60.0);
        assert_close(cw.sweep_angle, -60.0);
    }

    #[test]
    fn test_negative_radius_keeps_direction_side() {
        let resolve = |r| {
            RESOLVER
                .resolve(
                    Point3::ZERO,
                    Point3::new(2.0, 0.0, 0.0),
                    ArcDirection::CounterClockwise,
                    &radius(r),
                    PositioningMode::Absolute,
                )
                .unwrap()
                .geometry
        };
        let positive = resolve(2.0);
        let negative = resolve(-2.0);

        assert!(negative.center.y > 0.0);
        assert_eq!(negative, positive);
        assert_close(negative.sweep_angle, 60.0);
    }

    #[test]
    fn test_clockwise_zero_sweep_starts_at_start() {
        // Start and end on the same ray from the center
        let resolution = RESOLVER
            .resolve(
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                ArcDirection::Clockwise,
                &offsets(0.0, 0.0),
                PositioningMode::Absolute,
            )
            .unwrap();
        let arc = resolution.geometry;

        assert!(arc.sweep_angle.is_sign_negative());
        assert!(arc.is_clockwise());
        assert!(arc.start_point().distance(Point3::new(1.0, 0.0, 0.0)) < 1e-9);
        assert_eq!(resolution.warnings.len(), 1);
    }

    #[test]
    fn test_short_radius_is_clamped_with_warning() {
        let resolution = RESOLVER
            .resolve(
                Point3::ZERO,
                Point3::new(4.0, 0.0, 0.0),
                ArcDirection::CounterClockwise,
                &radius(1.0),
                PositioningMode::Absolute,
            )
            .unwrap();

        assert_eq!(resolution.geometry.center, Point3::new(2.0, 0.0, 0.0));
        assert_close(resolution.geometry.sweep_angle, 180.0);
        assert_eq!(resolution.warnings.len(), 1);
    }

    #[test]
    fn test_radius_mismatch_warns() {
        let resolution = RESOLVER
            .resolve(
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 2.0, 0.0),
                ArcDirection::CounterClockwise,
                &offsets(-1.0, 0.0),
                PositioningMode::Incremental,
            )
            .unwrap();

        assert!(resolution.warnings[0].contains("differ"));
    }

    #[test]
    fn test_faults() {
        let start = Point3::new(1.0, 1.0, 0.0);
        let resolve = |end: Point3, params: ArcParams| {
            RESOLVER
                .resolve(start, end, ArcDirection::Clockwise, &params, PositioningMode::Incremental)
                .map(|resolution| resolution.geometry)
        };

        assert_eq!(
            resolve(Point3::ZERO, ArcParams::default()),
            Err(ArcFault::MissingGeometry)
        );
        assert_eq!(resolve(start, radius(1.0)), Err(ArcFault::ZeroChord));
        assert_eq!(
            resolve(Point3::ZERO, offsets(0.0, 0.0)),
            Err(ArcFault::ZeroRadius)
        );
        assert_eq!(
            resolve(Point3::ZERO, offsets(-1.0, -1.0)),
            Err(ArcFault::EndAtCenter)
        );
    }

    #[test]
    fn test_normalize_degrees() {
        assert_close(normalize_degrees(-90.0), 270.0);
        assert_close(normalize_degrees(540.0), 180.0);
        assert_close(normalize_degrees(360.0), 0.0);
    }
}
