//! Command-line application: select inputs, interpret, write output, and
//! optionally keep re-interpreting as the program changes.

pub mod output;
pub mod watch;

use std::io::Write;

use anyhow::Result;

use crate::config::Config;
use crate::input::{load_program, InputMatcher, InputSelection, ReferenceModel};
use crate::interpreter::Interpreter;

pub use output::write_program;
pub use watch::{ProgramWatcher, WatchEvent};

/// A loaded set of inputs and the interpreter that reads them
pub struct Session {
    pub config: Config,
    pub inputs: InputSelection,
    pub model: Option<ReferenceModel>,
    interpreter: Interpreter,
}

impl Session {
    /// Pick inputs from the configured paths
    ///
    /// Fails when no motion program is among them; a missing solid only warns.
    pub fn new(config: Config) -> Result<Self> {
        let inputs = InputMatcher::new()?.select(&config.paths)?;
        let model = ReferenceModel::open_optional(inputs.model.as_deref());
        let interpreter = Interpreter::new(config.settings.clone());

        Ok(Self {
            config,
            inputs,
            model,
            interpreter,
        })
    }

    /// Interpret the program from disk and write it out
    pub fn render_once<W: Write>(&self, out: &mut W) -> Result<()> {
        let program = load_program(&self.inputs.program, &self.interpreter)?;
        write_program(
            out,
            self.config.format,
            &self.inputs.program,
            &program,
            self.model.as_ref(),
            &self.config.settings,
        )
    }

    /// Re-render on every change until the watcher shuts down
    pub async fn watch<W: Write>(&self, out: &mut W) -> Result<()> {
        let mut watcher = ProgramWatcher::new(&self.inputs.program)?;

        while let Some(event) = watcher.next_event().await {
            match event {
                WatchEvent::ProgramChanged(path) => {
                    log::info!("Program changed: {}", path.display());
                    // A half-written file is expected mid-save; keep watching
                    if let Err(e) = self.render_once(out) {
                        log::error!("{:#}", e);
                    }
                }
                WatchEvent::WatcherError(e) => {
                    log::error!("Program watcher error: {}", e);
                }
            }
        }
        Ok(())
    }
}

/// Entry point of the `gcode-viz` binary
pub async fn run() -> Result<()> {
    let config = Config::from_args_and_env()?;
    init_logging(&config.log_level);

    for source in &config.settings_sources {
        log::info!("Using settings from {}", source.display());
    }

    let session = Session::new(config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    session.render_once(&mut out)?;
    if session.config.watch {
        session.watch(&mut out).await?;
    }
    Ok(())
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    env_logger::Builder::from_env(env).init();
}
