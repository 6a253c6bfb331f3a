//! Integration tests for program file watching
use std::fs;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use gcode_pathviz::app::{ProgramWatcher, Session, WatchEvent};
use gcode_pathviz::config::{Args, Config};
use tempfile::TempDir;
use tokio::time::{sleep, timeout};

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);
const QUIET_PERIOD: Duration = Duration::from_millis(500);
/// Time for the watcher to register before the first write
const STARTUP_DELAY: Duration = Duration::from_millis(200);

fn write_program(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write program");
    path
}

fn assert_changed(event: WatchEvent, program: &Path) {
    match event {
        WatchEvent::ProgramChanged(path) => assert_eq!(path.file_name(), program.file_name()),
        other => panic!("Expected program change, got {:?}", other),
    }
}

#[tokio::test]
async fn test_program_modification_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let program = write_program(&dir, "part.nc", "G1 X1\n");
    let mut watcher = ProgramWatcher::new(&program).expect("create watcher");
    sleep(STARTUP_DELAY).await;

    fs::write(&program, "G1 X2\n").expect("modify program");

    let event = timeout(EVENT_TIMEOUT, watcher.next_event())
        .await
        .expect("change detected in time")
        .expect("watcher still running");
    assert_changed(event, &program);
}

#[tokio::test]
async fn test_burst_of_writes_folds_into_one_event() {
    let dir = TempDir::new().expect("temp dir");
    let program = write_program(&dir, "part.nc", "G1 X1\n");
    let mut watcher = ProgramWatcher::new(&program).expect("create watcher");
    sleep(STARTUP_DELAY).await;

    for i in 0..5 {
        fs::write(&program, format!("G1 X{}\n", i)).expect("modify program");
    }

    let event = timeout(EVENT_TIMEOUT, watcher.next_event())
        .await
        .expect("change detected in time")
        .expect("watcher still running");
    assert_changed(event, &program);

    // Everything from the burst was drained with the first event
    assert!(
        timeout(QUIET_PERIOD, watcher.next_event()).await.is_err(),
        "burst produced more than one event"
    );
}

#[tokio::test]
async fn test_sibling_files_are_ignored() {
    let dir = TempDir::new().expect("temp dir");
    let program = write_program(&dir, "part.nc", "G1 X1\n");
    let mut watcher = ProgramWatcher::new(&program).expect("create watcher");
    sleep(STARTUP_DELAY).await;

    write_program(&dir, "other.nc", "G0 X5\n");

    assert!(timeout(QUIET_PERIOD, watcher.next_event()).await.is_err());
}

#[test]
fn test_watcher_needs_a_file_path() {
    assert!(ProgramWatcher::new(Path::new("/")).is_err());
}

#[tokio::test]
async fn test_session_rerenders_on_change() {
    let dir = TempDir::new().expect("temp dir");
    let program = write_program(&dir, "part.nc", "G1 X1\n");
    let program_arg = program.to_str().expect("utf-8 path");
    let args = Args::try_parse_from(["gcode-viz", program_arg, "--scale", "1"]).expect("args");
    let config = Config::from_args(args, dir.path(), None).expect("config");
    let session = Session::new(config).expect("session");

    let writer = tokio::spawn({
        let program = program.clone();
        async move {
            sleep(STARTUP_DELAY).await;
            fs::write(&program, "G1 X1\nG1 Y4\n").expect("modify program");
        }
    });

    let mut out = Vec::new();
    // The watch loop only ends with the watcher, so stop it after the reload
    let result = timeout(Duration::from_secs(2), session.watch(&mut out)).await;
    assert!(result.is_err());
    writer.await.expect("writer task");

    let text = String::from_utf8(out).expect("utf-8 output");
    assert!(text.contains("segments:  2 (2 lines, 0 arcs)"), "{text}");
}
