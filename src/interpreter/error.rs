use std::collections::TryReserveError;

use thiserror::Error;

/// Failures that abort interpretation
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("out of memory growing the segment buffer past {segments} segments (line {line})")]
    ResourceExhausted {
        segments: usize,
        line: usize,
        #[source]
        source: TryReserveError,
    },
}
