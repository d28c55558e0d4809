//! Verbosity-gated logger for level processing
//!
//! Messages go to stdout, to an in-memory buffer, or to both. The buffer
//! lets tests assert on what the parser reported without scraping stdout.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// How much the logger reports
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum VerbosityLevel {
    /// Nothing at all
    Silent = 0,
    /// Only results
    Minimal = 1,
    /// Actions and discarded input (default)
    #[default]
    Normal = 2,
    /// Every header field and object
    Verbose = 3,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g. "header", "object")
    pub category: Option<String>,
}

/// Read-only view of captured entries; derefs to `[LogEntry]`
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

pub struct LevelLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl LevelLogger {
    pub fn new() -> Self {
        LevelLogger::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        LevelLogger {
            verbosity,
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    /// Logger that reports nothing; used by the plain parse entry points
    pub fn silent() -> Self {
        LevelLogger::with_verbosity(VerbosityLevel::Silent)
    }

    /// Capture-only logger at the given verbosity
    pub fn capturing(verbosity: VerbosityLevel) -> Self {
        LevelLogger {
            output_mode: OutputMode::Memory,
            ..LevelLogger::with_verbosity(verbosity)
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    /// Captured entries at or below the logger's verbosity
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    /// True when a message at `level` would be printed or captured
    #[inline]
    pub fn enabled(&self, level: VerbosityLevel) -> bool {
        level != VerbosityLevel::Silent && level <= self.verbosity
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, None, message);
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, None, message);
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, None, message);
    }

    /// Log with a category attached to the captured entry
    pub fn categorized(&self, level: VerbosityLevel, category: &str, message: &str) {
        self.log(level, Some(category), message);
    }

    fn log(&self, level: VerbosityLevel, category: Option<&str>, message: &str) {
        if !self.enabled(level) {
            return;
        }

        if self.is_capturing() {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
                category: category.map(str::to_string),
            });
        }

        if matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both) {
            if level == VerbosityLevel::Minimal {
                println!("{}", message);
            } else {
                println!("  {}", message);
            }
        }
    }
}

impl Default for LevelLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LevelLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_creation() {
        let logger = LevelLogger::new();
        assert_eq!(logger.verbosity(), VerbosityLevel::Normal);
        assert_eq!(logger.output_mode(), OutputMode::Stdout);
        assert!(!logger.is_capturing());
    }

    #[test]
    fn test_capture_respects_verbosity() {
        let logger = LevelLogger::capturing(VerbosityLevel::Normal);
        logger.minimal("done");
        logger.normal("dropped header fragment");
        logger.verbose("object 3");

        let logs = logger.logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "done");
        assert_eq!(logs[0].level, VerbosityLevel::Minimal);
        assert_eq!(logs[1].message, "dropped header fragment");
    }

    #[test]
    fn test_silent_logs_nothing() {
        let mut logger = LevelLogger::silent();
        logger.set_output_mode(OutputMode::Memory);
        logger.minimal("x");
        assert!(logger.logs().is_empty());
    }

    #[test]
    fn test_categories_and_clear() {
        let mut logger = LevelLogger::capturing(VerbosityLevel::Verbose);
        logger.categorized(VerbosityLevel::Verbose, "header", "COLORS 185");
        assert_eq!(logger.logs()[0].category.as_deref(), Some("header"));

        logger.clear_logs();
        assert!(logger.logs().is_empty());
    }

    #[test]
    fn test_verbosity_ordering() {
        assert!(VerbosityLevel::Silent < VerbosityLevel::Minimal);
        assert!(VerbosityLevel::Normal < VerbosityLevel::Verbose);
    }
}
