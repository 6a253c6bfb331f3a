//! Sinks that keep draw calls as data instead of drawing them.

use std::fmt;

use serde::Serialize;

use crate::color::Rgba;
use crate::path::{ArcGeometry, Point3};

use super::{clamp_arc_step, DrawSink, ARC_STEP_DEGREES};

/// A captured draw call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum DrawCall {
    Line {
        from: Point3,
        to: Point3,
        color: Rgba,
    },
    Arc {
        center: Point3,
        radius: f64,
        sweep_angle: f64,
        start_offset_angle: f64,
        height_per_turn: f64,
        color: Rgba,
    },
}

impl fmt::Display for DrawCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCall::Line { from, to, color } => write!(
                f,
                "line {:.4} {:.4} {:.4} -> {:.4} {:.4} {:.4} #{:02x}{:02x}{:02x}{:02x}",
                from.x, from.y, from.z, to.x, to.y, to.z, color.r, color.g, color.b, color.a
            ),
            DrawCall::Arc {
                center,
                radius,
                sweep_angle,
                start_offset_angle,
                height_per_turn,
                color,
            } => write!(
                f,
                "arc center {:.4} {:.4} {:.4} r {:.4} sweep {:.3} offset {:.3} pitch {:.4} #{:02x}{:02x}{:02x}{:02x}",
                center.x,
                center.y,
                center.z,
                radius,
                sweep_angle,
                start_offset_angle,
                height_per_turn,
                color.r,
                color.g,
                color.b,
                color.a
            ),
        }
    }
}

/// Records lines and arcs exactly as issued
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<DrawCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawSink for RecordingSink {
    fn draw_line(&mut self, from: Point3, to: Point3, color: Rgba) {
        self.calls.push(DrawCall::Line { from, to, color });
    }

    fn draw_arc(&mut self, arc: &ArcGeometry, color: Rgba) {
        self.calls.push(DrawCall::Arc {
            center: arc.center,
            radius: arc.radius,
            sweep_angle: arc.sweep_angle,
            start_offset_angle: arc.start_offset_angle,
            height_per_turn: arc.height_per_turn,
            color,
        });
    }
}

/// Flattens everything into line segments
#[derive(Debug)]
pub struct PolylineSink {
    step: f64,
    pub lines: Vec<(Point3, Point3, Rgba)>,
}

impl PolylineSink {
    /// Flatten arcs every `step` degrees, clamped like [`arc_points`](super::arc_points)
    pub fn new(step: f64) -> Self {
        Self {
            step: clamp_arc_step(step),
            lines: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.lines.len() * 2
    }
}

impl Default for PolylineSink {
    fn default() -> Self {
        Self::new(ARC_STEP_DEGREES)
    }
}

impl DrawSink for PolylineSink {
    fn draw_line(&mut self, from: Point3, to: Point3, color: Rgba) {
        self.lines.push((from, to, color));
    }

    fn arc_step_degrees(&self) -> f64 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Palette;

    #[test]
    fn test_line_call_display() {
        let call = DrawCall::Line {
            from: Point3::ZERO,
            to: Point3::new(1.0, 2.0, 0.5),
            color: Palette::default().feed,
        };

        assert_eq!(
            call.to_string(),
            "line 0.0000 0.0000 0.0000 -> 1.0000 2.0000 0.5000 #0079f1ff"
        );
    }

    #[test]
    fn test_polyline_sink_rejects_zero_step() {
        let sink = PolylineSink::new(0.0);
        assert_eq!(sink.arc_step_degrees(), ARC_STEP_DEGREES);
    }

    #[test]
    fn test_polyline_sink_flattens_arcs() {
        let arc = ArcGeometry {
            center: Point3::ZERO,
            radius: 1.0,
            sweep_angle: 360.0,
            start_offset_angle: 180.0,
            height_per_turn: 0.0,
        };
        let mut sink = PolylineSink::new(30.0);
        sink.draw_arc(&arc, Palette::default().arc);

        assert_eq!(sink.lines.len(), 12);
        assert!(sink.lines[0].0.distance(sink.lines[11].1) < 1e-12);
    }
}
