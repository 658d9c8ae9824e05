//! Structured run log
//!
//! Operators get back a structured, leveled log alongside the harvested
//! documents. Every statement is also mirrored to `tracing` so normal
//! logging infrastructure sees the same stream; WARNING statements are
//! additionally collected into a separate error list.

use std::fmt;

/// Severity of a log statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Debug,
    Warning,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Warning => "WARNING",
        };
        write!(f, "{}", s)
    }
}

/// One appended log statement
#[derive(Debug, Clone, PartialEq)]
pub struct LogStatement {
    pub message: String,
    pub level: LogLevel,
}

/// Append-only leveled log for one harvest run
#[derive(Debug, Default)]
pub struct RunLog {
    statements: Vec<LogStatement>,
    errors: Vec<LogStatement>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a statement and mirrors it to the tracing subscriber
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Debug => tracing::debug!("{}", message),
            LogLevel::Warning => {
                tracing::warn!("{}", message);
                self.errors.push(LogStatement {
                    message: message.clone(),
                    level,
                });
            }
        }
        self.statements.push(LogStatement { message, level });
    }

    /// All statements, in append order
    pub fn statements(&self) -> &[LogStatement] {
        &self.statements
    }

    /// Statements matching `level`, in append order
    pub fn statements_at(&self, level: LogLevel) -> Vec<LogStatement> {
        self.statements
            .iter()
            .filter(|s| s.level == level)
            .cloned()
            .collect()
    }

    /// WARNING statements only
    pub fn errors(&self) -> &[LogStatement] {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_lands_in_errors() {
        let mut log = RunLog::new();
        log.log(LogLevel::Info, "loading pages");
        log.log(LogLevel::Warning, "listing failed");
        log.log(LogLevel::Debug, "skipping locked page");

        assert_eq!(log.statements().len(), 3);
        assert_eq!(log.errors().len(), 1);
        assert_eq!(log.errors()[0].message, "listing failed");
    }

    #[test]
    fn test_level_filter() {
        let mut log = RunLog::new();
        log.log(LogLevel::Info, "a");
        log.log(LogLevel::Debug, "b");
        log.log(LogLevel::Info, "c");

        let info = log.statements_at(LogLevel::Info);
        assert_eq!(info.len(), 2);
        assert_eq!(info[0].message, "a");
        assert_eq!(info[1].message, "c");
    }

    #[test]
    fn test_level_display() {
        assert_eq!(LogLevel::Warning.to_string(), "WARNING");
        assert_eq!(LogLevel::Info.to_string(), "INFO");
    }
}
