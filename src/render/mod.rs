//! Path Renderer
//!
//! Replays a [`Path`] as draw calls. Rendering keeps no state between
//! calls, so it can run every frame over the same path.

pub mod recording;

use crate::color::Rgba;
use crate::path::{ArcGeometry, Path, Point3, SegmentKind};

pub use recording::{DrawCall, PolylineSink, RecordingSink};

/// Angular step used when an arc is flattened into lines
pub const ARC_STEP_DEGREES: f64 = 5.0;

/// Finest step accepted when flattening; bounds the vertex count of a turn
pub const MIN_ARC_STEP_DEGREES: f64 = 0.01;

/// Clamp a flattening step into the supported range
///
/// Non-finite or non-positive steps fall back to [`ARC_STEP_DEGREES`].
pub fn clamp_arc_step(step: f64) -> f64 {
    if step.is_finite() && step > 0.0 {
        step.clamp(MIN_ARC_STEP_DEGREES, 360.0)
    } else {
        ARC_STEP_DEGREES
    }
}

/// Drawing primitives offered by a rendering backend
pub trait DrawSink {
    fn draw_line(&mut self, from: Point3, to: Point3, color: Rgba);

    /// Draw a circular or helical arc
    ///
    /// The default flattens the arc into lines at [`DrawSink::arc_step_degrees`].
    fn draw_arc(&mut self, arc: &ArcGeometry, color: Rgba) {
        let points = arc_points(arc, self.arc_step_degrees());
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], color);
        }
    }

    fn arc_step_degrees(&self) -> f64 {
        ARC_STEP_DEGREES
    }
}

/// Issue one draw call per segment
pub fn render_path<S: DrawSink + ?Sized>(path: &Path, sink: &mut S) {
    for (start, segment) in path.moves() {
        match &segment.kind {
            SegmentKind::Line => sink.draw_line(start, segment.endpoint, segment.color),
            SegmentKind::Arc(arc) => sink.draw_arc(arc, segment.color),
        }
    }
}

/// Sample an arc every `step` degrees, first and last points included
///
/// The final step is shortened so the polyline ends exactly at the end of
/// the sweep. `step` goes through [`clamp_arc_step`] first.
pub fn arc_points(arc: &ArcGeometry, step: f64) -> Vec<Point3> {
    let step = clamp_arc_step(step);
    let sweep = arc.sweep_angle.abs();
    let steps = (sweep / step).ceil().max(1.0) as usize;

    (0..=steps)
        .map(|i| arc.point_at((i as f64 * step).min(sweep)))
        .collect()
}
