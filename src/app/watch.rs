//! Program file watching for live reload.
//!
//! The parent directory is watched rather than the file itself, since many
//! editors save by replacing the file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Quiet period that folds a burst of events into one reload
const SETTLE_TIME: Duration = Duration::from_millis(150);

/// Events from the file watcher
#[derive(Debug)]
pub enum WatchEvent {
    ProgramChanged(PathBuf),
    WatcherError(notify::Error),
}

/// Watches a single program file
pub struct ProgramWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<WatchEvent>,
}

impl ProgramWatcher {
    pub fn new(program: &Path) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let file_name: OsString = program
            .file_name()
            .with_context(|| format!("Not a file path: {}", program.display()))?
            .to_os_string();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if let EventKind::Create(_) | EventKind::Modify(_) = event.kind {
                        for path in event.paths {
                            if path.file_name() == Some(file_name.as_os_str()) {
                                let _ = tx.send(WatchEvent::ProgramChanged(path));
                            }
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::WatcherError(e));
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(1)),
        )?;

        let dir = match program.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;
        log::info!("Watching {} for changes", program.display());

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Wait for the next change, folding events that arrive within the settle time
    pub async fn next_event(&mut self) -> Option<WatchEvent> {
        let event = self.rx.recv().await?;
        if let WatchEvent::WatcherError(_) = event {
            return Some(event);
        }

        tokio::time::sleep(SETTLE_TIME).await;
        while let Ok(next) = self.rx.try_recv() {
            if let WatchEvent::WatcherError(e) = next {
                log::error!("Program watcher error: {}", e);
            }
        }
        Some(event)
    }
}
