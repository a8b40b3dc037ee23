//! Unit tests for the Engine logging facade
//!
//! IMPORTANT: the logger and the severity threshold are process-wide. Tests
//! that touch them are marked #[serial], and captured entries are filtered by
//! source because unrelated tests running in parallel also log.

use crate::prism::{Config, Engine};
use crate::prism::log::{Logger, LogEntry, LogSeverity};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

const TEST_SOURCE: &str = "prism::engine_tests";

/// Test logger that captures entries logged from TEST_SOURCE
#[derive(Clone)]
struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CaptureLogger {
    fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn captured(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == TEST_SOURCE {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

fn install() -> CaptureLogger {
    let logger = CaptureLogger::new();
    Engine::set_logger(logger.clone());
    Engine::set_min_severity(LogSeverity::Trace);
    logger
}

fn restore() {
    Engine::reset_logger();
    Engine::set_min_severity(LogSeverity::Info);
}

// ============================================================================
// LOGGER TESTS
// ============================================================================

#[test]
#[serial]
fn test_custom_logger_receives_macro_output() {
    let logger = install();
    crate::engine_info!(TEST_SOURCE, "frame {}", 1);
    crate::engine_warn!(TEST_SOURCE, "uniform '{}' ignored", "ourColor");
    restore();

    let entries = logger.captured();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].severity, LogSeverity::Info);
    assert_eq!(entries[0].message, "frame 1");
    assert_eq!(entries[1].message, "uniform 'ourColor' ignored");
    assert!(entries[1].file.is_none());
}

#[test]
#[serial]
fn test_error_macro_carries_file_and_line() {
    let logger = install();
    crate::engine_error!(TEST_SOURCE, "link failed");
    restore();

    let entries = logger.captured();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].file.unwrap().ends_with("engine_tests.rs"));
    assert!(entries[0].line.unwrap() > 0);
}

#[test]
#[serial]
fn test_min_severity_filters() {
    let logger = install();
    Engine::set_min_severity(LogSeverity::Warn);
    assert!(!Engine::is_enabled(LogSeverity::Info));
    assert!(Engine::is_enabled(LogSeverity::Error));

    crate::engine_debug!(TEST_SOURCE, "dropped");
    crate::engine_info!(TEST_SOURCE, "dropped");
    crate::engine_warn!(TEST_SOURCE, "kept");
    crate::engine_error!(TEST_SOURCE, "kept");
    restore();

    let messages: Vec<_> = logger.captured().into_iter().map(|e| e.message).collect();
    assert_eq!(messages, vec!["kept", "kept"]);
}

#[test]
#[serial]
fn test_initialize_applies_config_log_level() {
    let config = Config {
        log_level: LogSeverity::Error,
        ..Config::default()
    };
    Engine::initialize(&config);
    assert_eq!(Engine::min_severity(), LogSeverity::Error);
    restore();
    assert_eq!(Engine::min_severity(), LogSeverity::Info);
}

#[test]
#[serial]
fn test_reset_logger_stops_capture() {
    let logger = install();
    restore();
    crate::engine_warn!(TEST_SOURCE, "after reset");
    assert!(logger.captured().is_empty());
}
