//! Modal interpreter state.

use serde::Serialize;

use crate::path::Point3;

/// Distance mode (G90/G91)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PositioningMode {
    #[default]
    Absolute,
    Incremental,
}

/// State carried from one line to the next
///
/// A plain value: each line takes the previous state and yields the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InterpreterState {
    /// Last resolved endpoint, in scene units
    pub position: Point3,
    pub mode: PositioningMode,
}

impl InterpreterState {
    pub fn with_mode(self, mode: PositioningMode) -> Self {
        Self { mode, ..self }
    }

    pub fn with_position(self, position: Point3) -> Self {
        Self { position, ..self }
    }
}
