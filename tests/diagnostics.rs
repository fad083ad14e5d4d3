//! Warnings emitted while scanning, captured through the `log` facade.

mod common;

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use tempfile::TempDir;

use common::Acquisition;
use libs_cube::{scan_directory, LoaderSchema, ScanError};

static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = RECORDS.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

fn install_logger() {
    // Already installed by another test in this binary.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Debug);
}

/// Skip warnings that mention a file under `dir`. Tests run in parallel, so
/// each one only looks at its own temp dir.
fn skip_warnings_under(dir: &Path) -> Vec<String> {
    let needle = dir.display().to_string();
    RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|(level, msg)| *level == Level::Warn && msg.contains("Skipping!"))
        .filter(|(_, msg)| msg.contains(&needle))
        .map(|(_, msg)| msg.clone())
        .collect()
}

#[test]
fn test_one_warning_for_a_skipped_file() {
    install_logger();
    let dir = TempDir::new().unwrap();
    Acquisition::raster(2, 2, 3)
        .without_calibration()
        .write(&dir.path().join("a.h5"))
        .unwrap();
    Acquisition::raster(2, 2, 3)
        .write(&dir.path().join("b.h5"))
        .unwrap();

    let (_, report) = scan_directory(dir.path(), &LoaderSchema::default()).unwrap();
    assert_eq!(report.skipped.len(), 1);

    let warnings = skip_warnings_under(dir.path());
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert!(warnings[0].contains("a.h5"));
    assert!(warnings[0].contains("calibration"));
}

#[test]
fn test_one_warning_per_file_on_exhaustion() {
    install_logger();
    let dir = TempDir::new().unwrap();
    Acquisition::raster(2, 2, 3)
        .without_calibration()
        .write(&dir.path().join("a.h5"))
        .unwrap();
    fs::write(dir.path().join("b.h5"), b"not hdf5").unwrap();
    fs::write(dir.path().join("c.h5"), b"").unwrap();

    let err = scan_directory(dir.path(), &LoaderSchema::default()).unwrap_err();
    assert!(matches!(err, ScanError::NoValidFile { attempted: 3 }));

    let warnings = skip_warnings_under(dir.path());
    assert_eq!(warnings.len(), 3, "{warnings:?}");
    for name in ["a.h5", "b.h5", "c.h5"] {
        assert_eq!(warnings.iter().filter(|w| w.contains(name)).count(), 1);
    }
}

#[test]
fn test_no_warnings_when_nothing_to_try() {
    install_logger();
    let dir = TempDir::new().unwrap();

    let err = scan_directory(dir.path(), &LoaderSchema::default()).unwrap_err();
    assert!(matches!(err, ScanError::NoValidFile { attempted: 0 }));
    assert!(skip_warnings_under(dir.path()).is_empty());
}
