//! Typed logging configuration.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Handler name whose level follows the requested verbosity.
pub const CONSOLE_HANDLER: &str = "console";

/// File handler narrowed to the requested verbosity on request.
pub const INFO_FILE_HANDLER: &str = "info_file_handler";

/// The complete logging configuration: formatters, handlers and the
/// logger-to-handler bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub formatters: BTreeMap<String, FormatterSpec>,
    #[serde(default)]
    pub handlers: BTreeMap<String, HandlerConfig>,
    #[serde(default)]
    pub loggers: BTreeMap<String, LoggerBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<LoggerBinding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatterSpec {
    /// `{field}` template, see [`crate::format::pattern`].
    #[serde(default = "default_format")]
    pub format: String,
    /// strftime-style date pattern for `{asctime}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datefmt: Option<String>,
    /// Align continuation lines of multi-line messages under the header.
    #[serde(default)]
    pub multiline: bool,
}

fn default_format() -> String {
    crate::format::pattern::DEFAULT_PATTERN.to_string()
}

impl Default for FormatterSpec {
    fn default() -> Self {
        Self {
            format: default_format(),
            datefmt: None,
            multiline: false,
        }
    }
}

/// One logging sink. The set of kinds is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandlerConfig {
    Console(ConsoleHandler),
    RotatingFile(RotatingFileHandler),
    File(FileHandler),
}

impl HandlerConfig {
    pub fn level(&self) -> Severity {
        match self {
            HandlerConfig::Console(h) => h.level,
            HandlerConfig::RotatingFile(h) => h.level,
            HandlerConfig::File(h) => h.level,
        }
    }

    pub fn set_level(&mut self, level: Severity) {
        match self {
            HandlerConfig::Console(h) => h.level = level,
            HandlerConfig::RotatingFile(h) => h.level = level,
            HandlerConfig::File(h) => h.level = level,
        }
    }

    pub fn formatter(&self) -> Option<&str> {
        match self {
            HandlerConfig::Console(h) => h.formatter.as_deref(),
            HandlerConfig::RotatingFile(h) => h.formatter.as_deref(),
            HandlerConfig::File(h) => h.formatter.as_deref(),
        }
    }

    pub fn filename(&self) -> Option<&PathBuf> {
        match self {
            HandlerConfig::Console(_) => None,
            HandlerConfig::RotatingFile(h) => Some(&h.filename),
            HandlerConfig::File(h) => Some(&h.filename),
        }
    }

    pub fn filename_mut(&mut self) -> Option<&mut PathBuf> {
        match self {
            HandlerConfig::Console(_) => None,
            HandlerConfig::RotatingFile(h) => Some(&mut h.filename),
            HandlerConfig::File(h) => Some(&mut h.filename),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    Stdout,
    #[default]
    Stderr,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Style output when the stream is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleHandler {
    #[serde(default = "default_level")]
    pub level: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
    #[serde(default)]
    pub stream: Stream,
    #[serde(default)]
    pub color: ColorChoice,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotatingFileHandler {
    #[serde(default = "default_level")]
    pub level: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
    pub filename: PathBuf,
    #[serde(default)]
    pub rotation: Rotation,
    /// Number of rotated files kept; older ones are deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_files: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileHandler {
    #[serde(default = "default_level")]
    pub level: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
    pub filename: PathBuf,
}

fn default_level() -> Severity {
    Severity::Debug
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerBinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Severity>,
    #[serde(default)]
    pub handlers: Vec<String>,
    #[serde(default = "default_propagate")]
    pub propagate: bool,
}

fn default_propagate() -> bool {
    true
}

impl Default for LoggerBinding {
    fn default() -> Self {
        Self {
            level: None,
            handlers: Vec::new(),
            propagate: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_kinds_deserialize() {
        let config: LoggingConfig = serde_json::from_str(
            r#"{
                "handlers": {
                    "console": {"kind": "console", "level": "INFO", "stream": "stdout", "color": "never"},
                    "info_file_handler": {"kind": "rotating_file", "filename": "info.log", "max_files": 3},
                    "errors": {"kind": "file", "level": "ERROR", "filename": "errors.log"}
                }
            }"#,
        )
        .unwrap();

        match &config.handlers["console"] {
            HandlerConfig::Console(h) => {
                assert_eq!(h.level, Severity::Info);
                assert_eq!(h.stream, Stream::Stdout);
                assert_eq!(h.color, ColorChoice::Never);
            }
            other => panic!("unexpected handler {other:?}"),
        }
        match &config.handlers[INFO_FILE_HANDLER] {
            HandlerConfig::RotatingFile(h) => {
                assert_eq!(h.level, Severity::Debug);
                assert_eq!(h.rotation, Rotation::Daily);
                assert_eq!(h.max_files, Some(3));
            }
            other => panic!("unexpected handler {other:?}"),
        }
        assert_eq!(config.handlers["errors"].level(), Severity::Error);
        assert!(config.root.is_none());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<LoggingConfig, _> =
            serde_json::from_str(r#"{"handlers": {"x": {"kind": "syslog"}}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_file_handler_requires_filename() {
        let result: Result<LoggingConfig, _> =
            serde_json::from_str(r#"{"handlers": {"x": {"kind": "file"}}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_binding_defaults() {
        let binding: LoggerBinding = serde_json::from_str("{}").unwrap();
        assert_eq!(binding, LoggerBinding::default());
        assert!(binding.propagate);
    }
}
