//! Named logger handles.
//!
//! `tracing` targets are fixed at compile time, so a [`Logger`] carries its
//! name as an event field instead. Its own level is always `DEBUG`; what is
//! actually shown is decided by handler thresholds.

use crate::severity::Severity;
use std::fmt::Display;
use std::panic::Location;
use std::path::Path;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logger {
    name: String,
    level: Severity,
}

/// A logger named after the calling source file (`src/jobs/train.rs` →
/// `train`).
#[track_caller]
pub fn get_logger() -> Logger {
    let file = Location::caller().file();
    let name = Path::new(file)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());
    Logger::new(name)
}

impl Logger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Severity::Debug,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn is_enabled_for(&self, severity: Severity) -> bool {
        self.level.admits(severity)
    }

    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl Display) {
        if !self.is_enabled_for(severity) {
            return;
        }
        let location = Location::caller();
        let name = self.name.as_str();
        let level = u64::from(self.level.verbosity());
        let file = location.file();
        let line = u64::from(location.line());

        // Field names must match the ones `LogRecord::from_event` reads.
        // `event!` needs a constant level.
        macro_rules! emit {
            ($lvl:expr) => {
                event!(
                    $lvl,
                    logger = name,
                    logger_level = level,
                    log.file = file,
                    log.line = line,
                    "{}",
                    message
                )
            };
        }
        match severity {
            Severity::Error => emit!(Level::ERROR),
            Severity::Warning => emit!(Level::WARN),
            Severity::Info => emit!(Level::INFO),
            Severity::Debug => emit!(Level::DEBUG),
        }
    }

    #[track_caller]
    pub fn debug(&self, message: impl Display) {
        self.log(Severity::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Display) {
        self.log(Severity::Info, message);
    }

    #[track_caller]
    pub fn warning(&self, message: impl Display) {
        self.log(Severity::Warning, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Display) {
        self.log(Severity::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_logger_is_named_after_caller_file() {
        let logger = get_logger();
        assert_eq!(logger.name(), "logger");
        assert_eq!(logger.level(), Severity::Debug);
    }

    #[test]
    fn test_logger_is_enabled_for_everything() {
        let logger = Logger::new("x");
        for severity in [
            Severity::Error,
            Severity::Warning,
            Severity::Info,
            Severity::Debug,
        ] {
            assert!(logger.is_enabled_for(severity));
        }
    }
}
