//! The closed set of G codes the interpreter acts on.

use crate::parser::Word;
use crate::path::Motion;

use super::state::PositioningMode;

/// Decoded meaning of a `G` word
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GCode {
    /// G90 / G91
    Positioning(PositioningMode),
    /// G0 / G1 / G2 / G3
    Motion(Motion),
    /// Anything else, skipped
    Unrecognized(f64),
}

impl GCode {
    /// Decode a word; callers only pass `G` words
    pub fn from_word(word: &Word) -> Self {
        match word.code() {
            Some(0) => GCode::Motion(Motion::Rapid),
            Some(1) => GCode::Motion(Motion::Feed),
            Some(2) => GCode::Motion(Motion::ClockwiseArc),
            Some(3) => GCode::Motion(Motion::CounterClockwiseArc),
            Some(90) => GCode::Positioning(PositioningMode::Absolute),
            Some(91) => GCode::Positioning(PositioningMode::Incremental),
            _ => GCode::Unrecognized(word.value),
        }
    }
}
