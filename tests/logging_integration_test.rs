//! Integration tests for logging functionality
//!
//! A process can install only one global subscriber, so everything that calls
//! `init_logging` successfully lives in a single test.

use mdb::config::LoggingConfig;
use mdb::logging::{init_logging, parse_log_level, structured::LOG_FILE_PREFIX};
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert!(!config.console_json);
}

#[test]
fn test_invalid_level_is_rejected_before_install() {
    assert!(parse_log_level("verbose").is_err());
    assert!(init_logging("verbose", &LoggingConfig::default()).is_err());
}

#[test]
fn test_file_logging_writes_json_lines() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("nested").join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        ..LoggingConfig::default()
    };

    let guard = init_logging("debug", &config).unwrap();
    assert!(log_path.is_dir());

    // A second global subscriber is refused
    assert!(init_logging("info", &LoggingConfig::default()).is_err());

    // Dropping the guard flushes the non-blocking writer
    drop(guard);

    let files: Vec<_> = std::fs::read_dir(&log_path)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX))
        .collect();
    assert_eq!(files.len(), 1);

    let contents = std::fs::read_to_string(files[0].path()).unwrap();
    assert!(contents.contains("Logging initialized"));
    assert!(contents.contains("\"local_enabled\":true"));
}
