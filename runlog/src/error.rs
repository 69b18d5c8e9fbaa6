//! Error types for run directory and logging setup

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort logging setup.
///
/// A missing configuration template is deliberately absent: it degrades to a
/// console-only configuration instead of failing.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Run identifier '{identifier:?}' must be a relative path naming a subdirectory")]
    InvalidIdentifierKind { identifier: PathBuf },

    #[error("Run directory '{path:?}' already exists")]
    DirectoryAlreadyExists { path: PathBuf },

    #[error("IO error at '{path:?}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse logging configuration '{path:?}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Verbosity {0} is out of range (expected 0, 1, 2 or 3)")]
    InvalidVerbosity(i64),

    #[error("Invalid format for formatter '{formatter}': {reason}")]
    InvalidFormat { formatter: String, reason: String },

    #[error("Unknown {kind} '{name}' referenced by '{referenced_by}'")]
    UnknownReference {
        kind: &'static str,
        name: String,
        referenced_by: String,
    },

    #[error("Failed to open log file for handler '{handler}': {source}")]
    Appender {
        handler: String,
        #[source]
        source: tracing_appender::rolling::InitError,
    },

    #[error("Failed to install global subscriber: {0}")]
    SubscriberInstall(String),
}

impl SetupError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SetupError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SetupError>;
