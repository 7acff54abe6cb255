//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry, DefaultLogger (severity floor, plain formatting)
//! and custom Logger implementations.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use std::sync::Mutex;
use std::time::SystemTime;

fn entry(severity: LogSeverity, message: &str) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "galaxy3d::SceneGraph".to_string(),
        message: message.to_string(),
        file: None,
        line: None,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug_names() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Error), "Error");
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_with_file_line() {
    let mut e = entry(LogSeverity::Error, "singular model-view");
    e.file = Some("cull_visitor.rs");
    e.line = Some(42);

    let cloned = e.clone();
    assert_eq!(cloned.severity, LogSeverity::Error);
    assert_eq!(cloned.file, Some("cull_visitor.rs"));
    assert_eq!(cloned.line, Some(42));
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_min_severity() {
    assert_eq!(DefaultLogger::new().min_severity(), LogSeverity::Trace);
    assert_eq!(DefaultLogger::default().min_severity(), LogSeverity::Trace);

    let logger = DefaultLogger::with_min_severity(LogSeverity::Warn);
    assert_eq!(logger.min_severity(), LogSeverity::Warn);
}

#[test]
fn test_default_logger_all_severities_do_not_panic() {
    let logger = DefaultLogger::new();
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        logger.log(&entry(severity, "message"));
        let mut located = entry(severity, "located");
        located.file = Some("scene_graph.rs");
        located.line = Some(7);
        logger.log(&located);
    }
}

#[test]
fn test_format_plain_without_location() {
    let text = DefaultLogger::format_plain(&entry(LogSeverity::Info, "frame culled"));
    assert!(text.contains("[INFO ]"));
    assert!(text.contains("[galaxy3d::SceneGraph]"));
    assert!(text.ends_with("frame culled"));
}

#[test]
fn test_format_plain_with_location() {
    let mut e = entry(LogSeverity::Error, "bad index");
    e.file = Some("scene_graph.rs");
    e.line = Some(120);
    let text = DefaultLogger::format_plain(&e);
    assert!(text.contains("[ERROR]"));
    assert!(text.ends_with("bad index (scene_graph.rs:120)"));
}

// ============================================================================
// LOGGER TRAIT TESTS
// ============================================================================

struct CountingLogger {
    count: Mutex<usize>,
}

impl Logger for CountingLogger {
    fn log(&self, _entry: &LogEntry) {
        *self.count.lock().unwrap() += 1;
    }
}

#[test]
fn test_custom_logger_implementation() {
    let logger = CountingLogger { count: Mutex::new(0) };
    logger.log(&entry(LogSeverity::Debug, "a"));
    logger.log(&entry(LogSeverity::Debug, "b"));
    assert_eq!(*logger.count.lock().unwrap(), 2);
}

#[test]
fn test_logger_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
    assert_send_sync::<CountingLogger>();
}
