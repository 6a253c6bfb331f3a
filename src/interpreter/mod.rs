//! G-code Interpreter
//!
//! Walks a program line by line and builds the tool [`Path`]. The only
//! state carried between lines is an [`InterpreterState`] value, which each
//! line consumes and returns.
//!
//! Per line:
//! - `G90`/`G91` switch the positioning mode and scanning continues
//! - the first `G0`-`G3` word produces the line's only segment, using the
//!   `X Y Z I J K R` words that follow it; later words are ignored
//! - any other `G` code is skipped with an info diagnostic
//! - lines without a `G` word do nothing

pub mod arc;
pub mod codes;
pub mod diagnostics;
pub mod error;
pub mod state;

use std::io::BufRead;

use serde::Serialize;

use crate::config::Settings;
use crate::parser::{self, ParsedLine, Word};
use crate::path::{Motion, Path, Point3, Segment, SegmentKind};

pub use arc::{ArcCenterMode, ArcDirection, ArcFault, ArcParams, ArcResolution, ArcResolver};
pub use codes::GCode;
pub use diagnostics::{Diagnostic, Severity};
pub use error::InterpretError;
pub use state::{InterpreterState, PositioningMode};

/// Result of interpreting a whole program
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    pub path: Path,
    pub diagnostics: Vec<Diagnostic>,
    /// State after the last line
    pub state: InterpreterState,
    /// Set when reading stopped on an I/O error rather than end of input
    pub truncated: bool,
}

impl Program {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}

/// What one line did to the interpreter
#[derive(Debug, Clone, PartialEq)]
pub struct LineOutcome {
    pub state: InterpreterState,
    pub segment: Option<Segment>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LineOutcome {
    fn unchanged(state: InterpreterState) -> Self {
        Self {
            state,
            segment: None,
            diagnostics: Vec::new(),
        }
    }
}

/// Axis and arc words attached to a motion
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct MotionWords {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    arc: ArcParams,
}

impl MotionWords {
    /// Collect from the words after a motion code; the first occurrence of a letter wins
    ///
    /// Also returns the words that were taken.
    fn collect(words: &[Word]) -> (Self, Vec<&Word>) {
        let mut collected = Self::default();
        let mut used = Vec::new();
        for word in words {
            let slot = match word.letter {
                'X' => &mut collected.x,
                'Y' => &mut collected.y,
                'Z' => &mut collected.z,
                'I' => &mut collected.arc.i,
                'J' => &mut collected.arc.j,
                'K' => &mut collected.arc.k,
                'R' => &mut collected.arc.r,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(word.value);
                used.push(word);
            }
        }
        (collected, used)
    }

    fn axes(&self) -> [Option<f64>; 3] {
        [self.x, self.y, self.z]
    }
}

/// Stateless program interpreter
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    settings: Settings,
}

impl Interpreter {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn arc_resolver(&self) -> ArcResolver {
        ArcResolver {
            scale: self.settings.scale,
            centers: self.settings.arc_centers,
            radius_tolerance: self.settings.arc_radius_tolerance,
        }
    }

    /// Interpret an in-memory program
    pub fn parse_str(&self, source: &str) -> Result<Program, InterpretError> {
        self.parse_reader(source.as_bytes())
    }

    /// Interpret a program from a reader
    ///
    /// A read error ends the program early: the path built so far is
    /// returned with a warning and `truncated` set. Invalid UTF-8 is
    /// replaced rather than treated as an error.
    pub fn parse_reader<R: BufRead>(&self, mut reader: R) -> Result<Program, InterpretError> {
        let mut program = Program::default();
        let mut buffer = Vec::new();
        let mut line_number = 0;

        loop {
            buffer.clear();
            match reader.read_until(b'\n', &mut buffer) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    let diagnostic = Diagnostic::warning(
                        line_number + 1,
                        format!("stopped reading program: {}", e),
                    );
                    diagnostic.log();
                    program.diagnostics.push(diagnostic);
                    program.truncated = true;
                    break;
                }
            }
            line_number += 1;

            let text = String::from_utf8_lossy(&buffer);
            let parsed = parser::parse_line(&text);
            let outcome = self.interpret_line(program.state, line_number, &parsed);

            for diagnostic in &outcome.diagnostics {
                diagnostic.log();
            }
            program.diagnostics.extend(outcome.diagnostics);
            program.state = outcome.state;

            if let Some(segment) = outcome.segment {
                program
                    .path
                    .try_push(segment)
                    .map_err(|source| InterpretError::ResourceExhausted {
                        segments: program.path.len(),
                        line: line_number,
                        source,
                    })?;
            }
        }

        log::debug!(
            "interpreted {} lines into {} segments",
            line_number,
            program.path.len()
        );
        Ok(program)
    }

    /// Interpret one parsed line starting from `state`
    pub fn interpret_line(
        &self,
        state: InterpreterState,
        line_number: usize,
        parsed: &ParsedLine,
    ) -> LineOutcome {
        let mut outcome = LineOutcome::unchanged(state);
        let ParsedLine::Block(block) = parsed else {
            return outcome;
        };

        for (index, word) in block.words.iter().enumerate() {
            if word.letter != 'G' {
                continue;
            }
            report_malformed(word, line_number, &mut outcome.diagnostics);

            match GCode::from_word(word) {
                GCode::Positioning(mode) => {
                    outcome.state = outcome.state.with_mode(mode);
                }
                GCode::Motion(motion) => {
                    let (words, used) = MotionWords::collect(&block.words[index + 1..]);
                    for word in used {
                        report_malformed(word, line_number, &mut outcome.diagnostics);
                    }
                    let segment = self.motion_segment(
                        outcome.state,
                        motion,
                        &words,
                        line_number,
                        &mut outcome.diagnostics,
                    );
                    outcome.state = outcome.state.with_position(segment.endpoint);
                    outcome.segment = Some(segment);
                    break;
                }
                GCode::Unrecognized(code) => {
                    outcome.diagnostics.push(Diagnostic::info(
                        line_number,
                        format!("skipping unsupported G{}", code),
                    ));
                }
            }
        }

        outcome
    }

    fn motion_segment(
        &self,
        state: InterpreterState,
        motion: Motion,
        words: &MotionWords,
        line_number: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Segment {
        let color = motion.color(&self.settings.palette);
        let direction = match motion {
            Motion::Rapid | Motion::Feed => None,
            Motion::ClockwiseArc => Some(ArcDirection::Clockwise),
            Motion::CounterClockwiseArc => Some(ArcDirection::CounterClockwise),
        };

        let Some(direction) = direction else {
            return Segment {
                kind: SegmentKind::Line,
                motion,
                endpoint: self.line_target(state, words),
                color,
                line: line_number,
            };
        };

        let endpoint = self.arc_target(state, words);
        let kind = match self.arc_resolver().resolve(
            state.position,
            endpoint,
            direction,
            &words.arc,
            state.mode,
        ) {
            Ok(resolution) => {
                diagnostics.extend(
                    resolution
                        .warnings
                        .into_iter()
                        .map(|message| Diagnostic::warning(line_number, message)),
                );
                SegmentKind::Arc(resolution.geometry)
            }
            Err(fault) => {
                diagnostics.push(Diagnostic::warning(
                    line_number,
                    format!("{}; drawing a straight move instead", fault),
                ));
                SegmentKind::Line
            }
        };

        Segment {
            kind,
            motion,
            endpoint,
            color,
            line: line_number,
        }
    }

    /// Straight moves hold omitted axes
    fn line_target(&self, state: InterpreterState, words: &MotionWords) -> Point3 {
        let scale = self.settings.scale;
        let current = state.position.to_array();
        let mut target = current;

        for (axis, value) in words.axes().into_iter().enumerate() {
            target[axis] = match (state.mode, value) {
                (PositioningMode::Absolute, Some(v)) => v * scale,
                (PositioningMode::Absolute, None) => current[axis],
                (PositioningMode::Incremental, v) => current[axis] + v.unwrap_or(0.0) * scale,
            };
        }
        Point3::from_array(target)
    }

    /// Arc moves read an omitted axis as a literal zero
    fn arc_target(&self, state: InterpreterState, words: &MotionWords) -> Point3 {
        let [x, y, z] = words.axes().map(|v| v.unwrap_or(0.0) * self.settings.scale);
        let literal = Point3::new(x, y, z);

        match state.mode {
            PositioningMode::Absolute => literal,
            PositioningMode::Incremental => state.position + literal,
        }
    }
}

fn report_malformed(word: &Word, line_number: usize, diagnostics: &mut Vec<Diagnostic>) {
    if word.malformed {
        diagnostics.push(Diagnostic::warning(
            line_number,
            format!(
                "malformed number '{}' after {}; reading it as 0",
                word.literal, word.letter
            ),
        ));
    }
}
