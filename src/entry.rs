//! Immutable log records and their severity.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Severity of a [`LogEntry`], ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            _ => Err(Error::UnknownSeverity(s.to_string())),
        }
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Severity::Trace,
            tracing::Level::DEBUG => Severity::Debug,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::WARN => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A single log record. Never mutated after construction.
///
/// The message is shared behind an `Arc`, so cloning an entry out of the
/// ring is a reference-count bump rather than a string copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogEntry {
    level: Severity,
    message: Arc<str>,
}

impl LogEntry {
    pub fn new(level: Severity, message: impl Into<Arc<str>>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    #[inline]
    pub fn level(&self) -> Severity {
        self.level
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Debug);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("debug".parse::<Severity>().unwrap(), Severity::Debug);
        assert_eq!("WARN".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!(" Fatal ".parse::<Severity>().unwrap(), Severity::Fatal);

        let err = "loud".parse::<Severity>().unwrap_err();
        assert_eq!(err, Error::UnknownSeverity("loud".to_string()));
    }

    #[test]
    fn test_severity_from_tracing_level() {
        assert_eq!(Severity::from(tracing::Level::WARN), Severity::Warning);
        assert_eq!(Severity::from(tracing::Level::TRACE), Severity::Trace);
    }

    #[test]
    fn test_entry_accessors_and_display() {
        let entry = LogEntry::new(Severity::Error, "disk full");
        assert_eq!(entry.level(), Severity::Error);
        assert_eq!(entry.message(), "disk full");
        assert_eq!(entry.to_string(), "[ERROR] disk full");

        // Clones share the message allocation.
        let copy = entry.clone();
        assert!(std::ptr::eq(copy.message(), entry.message()));
    }
}
