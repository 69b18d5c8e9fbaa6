//! Severity levels and the verbosity integer that selects them.

use crate::error::{Result, SetupError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::Level;

/// Ordered urgency of a record, in verbosity order.
///
/// `Error < Warning < Info < Debug`: a handler at threshold `Info` accepts
/// every record whose severity compares `<= Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[serde(alias = "CRITICAL", alias = "error")]
    Error = 0,
    #[serde(alias = "WARN", alias = "warning", alias = "warn")]
    Warning = 1,
    #[serde(alias = "info")]
    Info = 2,
    #[serde(alias = "debug")]
    Debug = 3,
}

impl Severity {
    /// Map the user-facing verbosity (0 = errors only, 3 = debug) to a severity.
    pub fn from_verbosity(verbosity: i64) -> Result<Self> {
        match verbosity {
            0 => Ok(Severity::Error),
            1 => Ok(Severity::Warning),
            2 => Ok(Severity::Info),
            3 => Ok(Severity::Debug),
            other => Err(SetupError::InvalidVerbosity(other)),
        }
    }

    pub fn verbosity(self) -> u8 {
        self as u8
    }

    /// Level name as rendered by formatters.
    pub fn name(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// True when a record of severity `record` passes a threshold of `self`.
    pub fn admits(self, record: Severity) -> bool {
        record <= self
    }

    pub fn as_level(self) -> Level {
        match self {
            Severity::Error => Level::ERROR,
            Severity::Warning => Level::WARN,
            Severity::Info => Level::INFO,
            Severity::Debug => Level::DEBUG,
        }
    }
}

impl From<Level> for Severity {
    /// `TRACE` has no severity of its own and renders as `DEBUG`.
    fn from(level: Level) -> Self {
        match level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warning,
            Level::INFO => Severity::Info,
            _ => Severity::Debug,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
