//! # Console Logging
//!
//! Structured logging for the interactive console.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not printf-style: an entry has a
//! level, the command it belongs to when one is running, and typed
//! fields. Where entries go is a sink decision, kept behind a trait so
//! tests can capture them.

use std::fmt;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        write!(f, "{}", name)
    }
}

/// A structured log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Command being executed (if any)
    pub command: Option<String>,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            command: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Sets the command the entry belongs to
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.level)?;
        if let Some(command) = &self.command {
            write!(f, " [{}]", command)?;
        }
        write!(f, " {}", self.message)?;
        for (key, value) in &self.fields {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

/// Destination for log entries
pub trait LogSink {
    /// Receives one entry
    fn emit(&mut self, entry: &LogEntry);
}

impl<T: LogSink + ?Sized> LogSink for Box<T> {
    fn emit(&mut self, entry: &LogEntry) {
        (**self).emit(entry);
    }
}

/// Sink that writes one formatted line per entry to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn emit(&mut self, entry: &LogEntry) {
        eprintln!("{}", entry);
    }
}

/// Sink that keeps entries in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Vec<LogEntry>,
}

impl MemorySink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured entries
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Drops all captured entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl LogSink for MemorySink {
    fn emit(&mut self, entry: &LogEntry) {
        self.entries.push(entry.clone());
    }
}

/// Level-filtering logger over a sink
pub struct Logger<S: LogSink> {
    min_level: LogLevel,
    sink: S,
}

impl<S: LogSink> Logger<S> {
    /// Creates a logger that passes entries at or above `min_level`
    pub fn new(min_level: LogLevel, sink: S) -> Self {
        Self { min_level, sink }
    }

    /// Returns the sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Changes the minimum level
    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Emits an entry if it passes the level filter
    pub fn log(&mut self, entry: LogEntry) {
        if entry.level >= self.min_level {
            self.sink.emit(&entry);
        }
    }

    /// Logs a debug message
    pub fn debug(&mut self, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Debug, message));
    }

    /// Logs an informational message
    pub fn info(&mut self, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Info, message));
    }

    /// Logs a warning
    pub fn warn(&mut self, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Warn, message));
    }

    /// Logs an error
    pub fn error(&mut self, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Error, message));
    }
}
