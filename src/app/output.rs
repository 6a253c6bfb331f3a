//! Headless output of an interpreted program.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::config::{OutputFormat, Settings};
use crate::input::ReferenceModel;
use crate::interpreter::{Diagnostic, Program};
use crate::path::{Bounds, Path as ToolPath};
use crate::render::{render_path, PolylineSink, RecordingSink};

/// Everything the JSON output carries
#[derive(Debug, Serialize)]
struct Report<'a> {
    program: &'a Path,
    model: Option<&'a Path>,
    settings: &'a Settings,
    bounds: Option<Bounds>,
    truncated: bool,
    segments: &'a ToolPath,
    diagnostics: &'a [Diagnostic],
}

/// Write `program` to `out` in the requested format
pub fn write_program<W: Write>(
    out: &mut W,
    format: OutputFormat,
    source: &Path,
    program: &Program,
    model: Option<&ReferenceModel>,
    settings: &Settings,
) -> Result<()> {
    match format {
        OutputFormat::Summary => write_summary(out, source, program, model, settings)?,
        OutputFormat::Json => {
            let report = Report {
                program: source,
                model: model.map(|m| m.path.as_path()),
                settings,
                bounds: program.path.bounds(),
                truncated: program.truncated,
                segments: &program.path,
                diagnostics: &program.diagnostics,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::DrawCalls => {
            let mut sink = RecordingSink::new();
            render_path(&program.path, &mut sink);
            for call in &sink.calls {
                writeln!(out, "{}", call)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn write_summary<W: Write>(
    out: &mut W,
    source: &Path,
    program: &Program,
    model: Option<&ReferenceModel>,
    settings: &Settings,
) -> Result<()> {
    let path = &program.path;
    let mut polyline = PolylineSink::new(settings.arc_step_degrees);
    render_path(path, &mut polyline);

    writeln!(out, "program:   {}", source.display())?;
    match model {
        Some(model) => writeln!(
            out,
            "model:     {} ({} bytes)",
            model.path.display(),
            model.size_bytes
        )?,
        None => writeln!(out, "model:     none")?,
    }
    writeln!(
        out,
        "segments:  {} ({} lines, {} arcs)",
        path.len(),
        path.len() - path.arc_count(),
        path.arc_count()
    )?;
    writeln!(out, "vertices:  {}", polyline.vertex_count())?;

    let end = path.end();
    writeln!(out, "end:       {:.4} {:.4} {:.4}", end.x, end.y, end.z)?;
    if let Some(bounds) = path.bounds() {
        let (min, max) = (bounds.min, bounds.max);
        writeln!(
            out,
            "bounds:    {:.4} {:.4} {:.4} .. {:.4} {:.4} {:.4}",
            min.x, min.y, min.z, max.x, max.y, max.z
        )?;
    }
    if program.truncated {
        writeln!(out, "truncated: yes")?;
    }

    writeln!(out, "warnings:  {}", program.warnings().count())?;
    for diagnostic in &program.diagnostics {
        writeln!(out, "  {}", diagnostic)?;
    }
    Ok(())
}
