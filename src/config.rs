//! Configuration management for the tool-path viewer.
//!
//! Handles:
//! - Command-line argument parsing
//! - Interpreter settings layered from TOML files
//!
//! Settings sources, lowest priority first: built-in defaults, the user
//! config (`<config dir>/gcode-viz/config.toml`), the project file
//! `.gcode-viz.toml` in the working directory, an explicit `--config` file,
//! then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::color::Palette;
use crate::interpreter::ArcCenterMode;
use crate::render::ARC_STEP_DEGREES;

/// Project-level settings file name
pub const PROJECT_CONFIG_FILE: &str = ".gcode-viz.toml";

/// How the interpreted path is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Segment counts, bounds and warnings
    Summary,
    /// The full path as JSON
    Json,
    /// One draw call per line
    DrawCalls,
}

/// Command-line arguments for the tool-path viewer
#[derive(Debug, Parser)]
#[command(name = "gcode-viz")]
#[command(about = "Interpret G-code programs into line and arc tool-paths")]
#[command(version)]
pub struct Args {
    /// Motion program (.nc, .gc, .ngc, .gcode) and optional reference solid (.stl)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Re-interpret the program whenever it changes on disk
    #[arg(long)]
    pub watch: bool,

    /// Source units to scene units factor
    #[arg(long)]
    pub scale: Option<f64>,

    /// Settings file applied over user and project settings
    #[arg(long, help = "Path to a TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Interpreter and renderer settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Factor applied to every coordinate read from the program
    pub scale: f64,
    /// Angular step used when arcs are flattened
    pub arc_step_degrees: f64,
    /// Start/end radius difference tolerated before warning, in scene units
    pub arc_radius_tolerance: f64,
    pub arc_centers: ArcCenterMode,
    pub palette: Palette,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale: 0.1,
            arc_step_degrees: ARC_STEP_DEGREES,
            arc_radius_tolerance: 1e-3,
            arc_centers: ArcCenterMode::default(),
            palette: Palette::default(),
        }
    }
}

/// One settings file; absent keys leave lower layers alone
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsLayer {
    pub scale: Option<f64>,
    pub arc_step_degrees: Option<f64>,
    pub arc_radius_tolerance: Option<f64>,
    pub arc_centers: Option<ArcCenterMode>,
    pub palette: Option<Palette>,
}

impl SettingsLayer {
    /// Read a layer from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings TOML: {}", path.display()))
    }
}

impl Settings {
    pub fn apply(&mut self, layer: SettingsLayer) {
        if let Some(scale) = layer.scale {
            self.scale = scale;
        }
        if let Some(step) = layer.arc_step_degrees {
            self.arc_step_degrees = step;
        }
        if let Some(tolerance) = layer.arc_radius_tolerance {
            self.arc_radius_tolerance = tolerance;
        }
        if let Some(centers) = layer.arc_centers {
            self.arc_centers = centers;
        }
        if let Some(palette) = layer.palette {
            self.palette = palette;
        }
    }

    /// Reject values the interpreter cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale == 0.0 {
            bail!("scale must be a finite, non-zero number (got {})", self.scale);
        }
        if !self.arc_step_degrees.is_finite() || self.arc_step_degrees <= 0.0 {
            bail!(
                "arc_step_degrees must be positive (got {})",
                self.arc_step_degrees
            );
        }
        if self.arc_radius_tolerance.is_nan() || self.arc_radius_tolerance < 0.0 {
            bail!(
                "arc_radius_tolerance must not be negative (got {})",
                self.arc_radius_tolerance
            );
        }
        Ok(())
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Paths given on the command line
    pub paths: Vec<PathBuf>,
    pub format: OutputFormat,
    pub watch: bool,
    pub log_level: String,
    pub settings: Settings,
    /// Settings files that were applied, in order
    pub settings_sources: Vec<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        let project_dir = std::env::current_dir().context("Failed to read working directory")?;
        let user_dir = dirs::config_dir().map(|dir| dir.join("gcode-viz"));
        Self::from_args(Args::parse(), &project_dir, user_dir.as_deref())
    }

    /// Create configuration from explicit arguments and search directories
    pub fn from_args(args: Args, project_dir: &Path, user_dir: Option<&Path>) -> Result<Self> {
        let mut settings = Settings::default();
        let mut settings_sources = Vec::new();

        let optional = [
            user_dir.map(|dir| dir.join("config.toml")),
            Some(project_dir.join(PROJECT_CONFIG_FILE)),
        ];
        for path in optional.into_iter().flatten() {
            if path.is_file() {
                settings.apply(SettingsLayer::load(&path)?);
                log::debug!("Applied settings from {}", path.display());
                settings_sources.push(path);
            }
        }

        // An explicitly named file must exist
        if let Some(path) = args.config {
            settings.apply(SettingsLayer::load(&path)?);
            settings_sources.push(path);
        }

        if let Some(scale) = args.scale {
            settings.scale = scale;
        }
        settings.validate()?;

        Ok(Config {
            paths: args.paths,
            format: args.format,
            watch: args.watch,
            log_level: args.log_level,
            settings,
            settings_sources,
        })
    }
}
