//! Input selection and program loading.
//!
//! The command line takes a loose list of paths; the motion program and the
//! optional reference solid are picked out by extension.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use regex::Regex;

use crate::interpreter::{Interpreter, Program};

/// Extension patterns for the two kinds of input
#[derive(Debug, Clone)]
pub struct InputMatcher {
    program: Regex,
    model: Regex,
}

impl InputMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            program: Regex::new(r"(?i)\.(nc|gc|ngc|gcode)$")?,
            model: Regex::new(r"(?i)\.stl$")?,
        })
    }

    pub fn is_program(&self, path: &Path) -> bool {
        path.to_str().is_some_and(|p| self.program.is_match(p))
    }

    pub fn is_model(&self, path: &Path) -> bool {
        path.to_str().is_some_and(|p| self.model.is_match(p))
    }

    /// Pick the first program and first solid from `paths`
    pub fn select(&self, paths: &[PathBuf]) -> Result<InputSelection> {
        let program = paths
            .iter()
            .find(|p| self.is_program(p))
            .cloned()
            .ok_or_else(|| {
                anyhow!("No motion program given (expected a .nc, .gc, .ngc or .gcode file)")
            })?;
        let model = paths.iter().find(|p| self.is_model(p)).cloned();

        for ignored in paths.iter().filter(|p| **p != program && Some(*p) != model.as_ref()) {
            log::warn!("Ignoring input {}", ignored.display());
        }

        Ok(InputSelection { program, model })
    }
}

/// Files chosen from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct InputSelection {
    pub program: PathBuf,
    pub model: Option<PathBuf>,
}

/// Reference solid shown next to the path
///
/// The mesh itself is read by the rendering backend; this handle only
/// records where it lives.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceModel {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl ReferenceModel {
    pub fn open(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to open reference solid: {}", path.display()))?;
        if !metadata.is_file() {
            return Err(anyhow!("Reference solid is not a file: {}", path.display()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
        })
    }

    /// Open the solid if one was selected; a missing file only warns
    pub fn open_optional(path: Option<&Path>) -> Option<Self> {
        let path = path?;
        match Self::open(path) {
            Ok(model) => Some(model),
            Err(e) => {
                log::warn!("{:#}; showing the path without a reference solid", e);
                None
            }
        }
    }
}

/// Open and interpret a program file
pub fn load_program(path: &Path, interpreter: &Interpreter) -> Result<Program> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open motion program: {}", path.display()))?;
    let program = interpreter
        .parse_reader(BufReader::new(file))
        .with_context(|| format!("Failed to interpret motion program: {}", path.display()))?;

    log::info!(
        "Loaded {} ({} segments, {} warnings)",
        path.display(),
        program.path.len(),
        program.warnings().count()
    );
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_matching() {
        let matcher = InputMatcher::new().unwrap();

        for name in ["a.nc", "b.GC", "dir/c.ngc", "d.gcode"] {
            assert!(matcher.is_program(Path::new(name)), "{name}");
        }
        for name in ["a.stl", "a.nc.bak", "gcode", "a.txt"] {
            assert!(!matcher.is_program(Path::new(name)), "{name}");
        }
        assert!(matcher.is_model(Path::new("part.STL")));
    }

    #[test]
    fn test_select_in_any_order() {
        let matcher = InputMatcher::new().unwrap();
        let paths = vec![
            PathBuf::from("part.stl"),
            PathBuf::from("notes.txt"),
            PathBuf::from("part.ngc"),
        ];

        let selection = matcher.select(&paths).unwrap();
        assert_eq!(selection.program, PathBuf::from("part.ngc"));
        assert_eq!(selection.model, Some(PathBuf::from("part.stl")));
    }

    #[test]
    fn test_select_requires_program() {
        let matcher = InputMatcher::new().unwrap();
        assert!(matcher.select(&[PathBuf::from("part.stl")]).is_err());
    }

    #[test]
    fn test_missing_model_is_tolerated() {
        let missing = Path::new("/nonexistent/part.stl");
        assert!(ReferenceModel::open_optional(Some(missing)).is_none());
        assert!(ReferenceModel::open_optional(None).is_none());
    }
}
