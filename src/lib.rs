//! G-code Tool-Path Viewer
//!
//! Interprets CNC motion programs into line and arc tool-paths that a
//! renderer can replay every frame.
//!
//! This library provides:
//! - G-code tokenizing and line parsing
//! - An interpreter tracking positioning mode and tool position
//! - Arc resolution from center offsets or radius
//! - Stateless path rendering onto a draw sink
//! - Configuration and input selection for the `gcode-viz` binary

pub mod app;
pub mod color;
pub mod config;
pub mod input;
pub mod interpreter;
pub mod parser;
pub mod path;
pub mod render;

pub use color::{Palette, Rgba};
pub use config::{Config, Settings};
pub use interpreter::{Interpreter, InterpreterState, PositioningMode, Program};
pub use parser::{parse_line, ParsedLine};
pub use path::{ArcGeometry, Motion, Path, Point3, Segment, SegmentKind};
pub use render::{render_path, DrawSink};
