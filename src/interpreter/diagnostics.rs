//! Advisory messages raised while interpreting a program.

use serde::Serialize;

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
}

/// A diagnostic tied to a source line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn warning(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn info(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
            severity: Severity::Info,
        }
    }

    /// Forward to the logger at the matching level
    pub(crate) fn log(&self) {
        match self.severity {
            Severity::Warning => log::warn!("line {}: {}", self.line, self.message),
            Severity::Info => log::debug!("line {}: {}", self.line, self.message),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "line {}: {}: {}", self.line, label, self.message)
    }
}
