// tests/logging_file.rs
use std::{env, fs};

use euromillions::logging;

#[serial_test::serial]
#[test]
fn log_file_is_appended_without_ansi() {
    env::remove_var("RUST_LOG");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("update.log");
    fs::write(&path, "previous run\n").unwrap();

    logging::init(false, Some(&path)).unwrap();
    tracing::warn!(source = 3, "source failed, continuing");

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("previous run\n"));
    assert!(text.contains("source failed, continuing"));
    assert!(!text.contains('\u{1b}'), "no colour escapes in files");

    // The global subscriber is installed once per process.
    assert!(logging::init(true, None).is_err());
}
