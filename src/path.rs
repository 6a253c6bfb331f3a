//! Tool-path geometry produced by the interpreter.
//!
//! A [`Path`] is append-only while the interpreter builds it and read-only
//! afterwards. Segments store only their endpoint; the start of segment `i`
//! is the endpoint of segment `i - 1`, and the first segment starts at the
//! origin.

use std::collections::TryReserveError;

use glam::DVec3;
use serde::Serialize;

use crate::color::{Palette, Rgba};

/// A point in scene units
pub type Point3 = DVec3;

/// The command a segment was produced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    /// G0
    Rapid,
    /// G1
    Feed,
    /// G2
    ClockwiseArc,
    /// G3
    CounterClockwiseArc,
}

impl Motion {
    pub fn color(self, palette: &Palette) -> Rgba {
        match self {
            Motion::Rapid => palette.rapid,
            Motion::Feed => palette.feed,
            Motion::ClockwiseArc | Motion::CounterClockwiseArc => palette.arc,
        }
    }
}

/// Resolved circular (or helical) arc in the XY plane
///
/// Angles are in degrees. `start_offset_angle` is measured half a turn away
/// from the polar angle of the start point, and clockwise arcs add another
/// half turn; [`ArcGeometry::polar_start`] undoes both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArcGeometry {
    /// Center, at the Z height of the arc's start point
    pub center: Point3,
    pub radius: f64,
    /// Signed sweep; negative sweeps run clockwise
    pub sweep_angle: f64,
    pub start_offset_angle: f64,
    /// Z travel over a full 360° turn
    pub height_per_turn: f64,
}

impl ArcGeometry {
    /// Clockwise arcs carry a negative sweep, including `-0.0`
    pub fn is_clockwise(&self) -> bool {
        self.sweep_angle.is_sign_negative()
    }

    /// Polar angle of the start point around the center, in degrees
    pub fn polar_start(&self) -> f64 {
        let bias = if self.is_clockwise() { 360.0 } else { 180.0 };
        self.start_offset_angle - bias
    }

    /// Point reached after `progress` degrees of travel along the sweep
    ///
    /// `progress` is unsigned; the direction comes from the sweep sign.
    pub fn point_at(&self, progress: f64) -> Point3 {
        let angle = (self.polar_start() + progress * self.sweep_angle.signum()).to_radians();
        self.center
            + DVec3::new(
                self.radius * angle.cos(),
                self.radius * angle.sin(),
                progress / 360.0 * self.height_per_turn,
            )
    }

    pub fn start_point(&self) -> Point3 {
        self.point_at(0.0)
    }

    pub fn end_point(&self) -> Point3 {
        self.point_at(self.sweep_angle.abs())
    }
}

/// Drawable shape of a segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentKind {
    Line,
    Arc(ArcGeometry),
}

/// One motion of the tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub motion: Motion,
    pub endpoint: Point3,
    pub color: Rgba,
    /// 1-based source line
    pub line: usize,
}

impl Segment {
    pub fn arc(&self) -> Option<&ArcGeometry> {
        match &self.kind {
            SegmentKind::Arc(arc) => Some(arc),
            SegmentKind::Line => None,
        }
    }
}

/// Axis-aligned box enclosing a path
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Point3,
    pub max: Point3,
}

impl Bounds {
    fn around(point: Point3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    fn include(&mut self, point: Point3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Point3 {
        (self.min + self.max) / 2.0
    }
}

/// Ordered sequence of segments forming a continuous tool-path
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment, reporting allocation failure instead of aborting
    pub(crate) fn try_push(&mut self, segment: Segment) -> Result<(), TryReserveError> {
        if self.segments.len() == self.segments.capacity() {
            // Vec doubles on reserve past capacity
            self.segments.try_reserve(self.segments.len().max(16))?;
        }
        self.segments.push(segment);
        Ok(())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Implicit start point of segment `index`
    pub fn start_of(&self, index: usize) -> Point3 {
        match index {
            0 => Point3::ZERO,
            i => self.segments[i - 1].endpoint,
        }
    }

    /// Final tool position (origin for an empty path)
    pub fn end(&self) -> Point3 {
        self.segments
            .last()
            .map_or(Point3::ZERO, |segment| segment.endpoint)
    }

    /// Segments paired with their start points
    pub fn moves(&self) -> impl Iterator<Item = (Point3, &Segment)> + '_ {
        let starts = std::iter::once(Point3::ZERO).chain(self.segments.iter().map(|s| s.endpoint));
        starts.zip(self.segments.iter())
    }

    pub fn arc_count(&self) -> usize {
        self.segments.iter().filter(|s| s.arc().is_some()).count()
    }

    /// Bounding box of the path including the origin
    ///
    /// Arcs contribute their whole circle, which over-approximates partial
    /// sweeps.
    pub fn bounds(&self) -> Option<Bounds> {
        if self.segments.is_empty() {
            return None;
        }

        let mut bounds = Bounds::around(Point3::ZERO);
        for (start, segment) in self.moves() {
            bounds.include(segment.endpoint);
            if let Some(arc) = segment.arc() {
                let reach = DVec3::new(arc.radius, arc.radius, 0.0);
                bounds.include(arc.center - reach);
                bounds.include(arc.center + reach);
                bounds.include(start);
            }
        }
        Some(bounds)
    }
}
