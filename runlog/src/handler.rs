//! Handlers: a threshold, a formatter and a sink.
//!
//! Each handler owns its sink behind a `Mutex`, so records dispatched from
//! several threads are written whole and in order per handler. File sinks are
//! `tracing_appender` non-blocking writers; the matching `WorkerGuard` is
//! returned to the caller and must be kept alive for output to be flushed.

use crate::config::{ColorChoice, FormatterSpec, HandlerConfig, Rotation, Stream};
use crate::error::{Result, SetupError};
use crate::format::{FieldStyles, MultiLineFormatter, PatternFormatter, RecordFormatter};
use crate::record::LogRecord;
use crate::severity::Severity;
use std::collections::BTreeMap;
use std::fs;
use std::io::{IsTerminal, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{self, RollingFileAppender};

enum Sink {
    Stdout,
    Stderr,
    File(NonBlocking),
}

impl Sink {
    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        match self {
            Sink::Stdout => writeln!(std::io::stdout().lock(), "{line}"),
            Sink::Stderr => writeln!(std::io::stderr().lock(), "{line}"),
            Sink::File(writer) => writeln!(writer, "{line}"),
        }
    }
}

pub struct Handler {
    name: String,
    level: Severity,
    formatter: Box<dyn RecordFormatter>,
    sink: Mutex<Sink>,
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl Handler {
    /// Build the handler `name` from its configuration.
    ///
    /// `formatters` must contain every formatter the handler references;
    /// [`crate::config::LoggingConfig::validate`] guarantees that.
    pub fn build(
        name: &str,
        config: &HandlerConfig,
        formatters: &BTreeMap<String, FormatterSpec>,
    ) -> Result<(Self, Option<WorkerGuard>)> {
        let spec = match config.formatter() {
            Some(formatter) => {
                Some(
                    formatters
                        .get(formatter)
                        .ok_or_else(|| SetupError::UnknownReference {
                            kind: "formatter",
                            name: formatter.to_string(),
                            referenced_by: name.to_string(),
                        })?,
                )
            }
            None => None,
        };

        let (sink, colored, guard) = match config {
            HandlerConfig::Console(console) => {
                let (sink, is_terminal) = match console.stream {
                    Stream::Stdout => (Sink::Stdout, std::io::stdout().is_terminal()),
                    Stream::Stderr => (Sink::Stderr, std::io::stderr().is_terminal()),
                };
                let colored = match console.color {
                    ColorChoice::Always => true,
                    ColorChoice::Never => false,
                    ColorChoice::Auto => is_terminal,
                };
                (sink, colored, None)
            }
            HandlerConfig::RotatingFile(file) => {
                let (writer, guard) =
                    file_writer(name, &file.filename, file.rotation, file.max_files)?;
                (Sink::File(writer), false, Some(guard))
            }
            HandlerConfig::File(file) => {
                let (writer, guard) = file_writer(name, &file.filename, Rotation::Never, None)?;
                (Sink::File(writer), false, Some(guard))
            }
        };

        let formatter = build_formatter(name, spec, colored)?;
        Ok((
            Self {
                name: name.to_string(),
                level: config.level(),
                formatter,
                sink: Mutex::new(sink),
            },
            guard,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    /// Format and write `record` if it passes this handler's threshold.
    pub fn handle(&self, record: &LogRecord) {
        if !self.level.admits(record.severity) {
            return;
        }
        let line = self.formatter.format(record);
        // A poisoned sink still holds a usable writer.
        let mut sink = self.sink.lock().unwrap_or_else(|e| e.into_inner());
        let _ = sink.write_line(&line);
    }
}

/// Build the formatter a handler renders with. Handlers without a formatter
/// print the bare message.
pub fn build_formatter(
    handler: &str,
    spec: Option<&FormatterSpec>,
    colored: bool,
) -> Result<Box<dyn RecordFormatter>> {
    let Some(spec) = spec else {
        return Ok(Box::new(pattern(handler, "{message}")?));
    };
    let mut formatter = pattern(handler, &spec.format)?;
    if let Some(datefmt) = &spec.datefmt {
        formatter = formatter.with_date_format(datefmt.clone());
    }
    if colored {
        formatter = formatter.with_styles(FieldStyles::default());
    }
    if spec.multiline {
        Ok(Box::new(MultiLineFormatter::new(formatter)))
    } else {
        Ok(Box::new(formatter))
    }
}

fn pattern(handler: &str, format: &str) -> Result<PatternFormatter> {
    PatternFormatter::new(format).map_err(|e| SetupError::InvalidFormat {
        formatter: handler.to_string(),
        reason: e.to_string(),
    })
}

fn file_writer(
    handler: &str,
    filename: &Path,
    rotation: Rotation,
    max_files: Option<usize>,
) -> Result<(NonBlocking, WorkerGuard)> {
    let directory = filename
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(directory).map_err(|e| SetupError::io(directory, e))?;

    let prefix = filename
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            SetupError::io(
                filename,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "log path has no file name"),
            )
        })?;

    let rotation = match rotation {
        Rotation::Minutely => rolling::Rotation::MINUTELY,
        Rotation::Hourly => rolling::Rotation::HOURLY,
        Rotation::Daily => rolling::Rotation::DAILY,
        Rotation::Never => rolling::Rotation::NEVER,
    };
    let mut builder = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(prefix);
    if let Some(max_files) = max_files {
        builder = builder.max_log_files(max_files);
    }
    let appender = builder.build(directory).map_err(|source| SetupError::Appender {
        handler: handler.to_string(),
        source,
    })?;

    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileHandler;
    use tempfile::tempdir;

    #[test]
    fn test_file_handler_respects_threshold() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("errors.log");
        let config = HandlerConfig::File(FileHandler {
            level: Severity::Warning,
            formatter: None,
            filename: path.clone(),
        });
        let (handler, guard) = Handler::build("errors", &config, &BTreeMap::new()).unwrap();
        handler.handle(&LogRecord::new("t", Severity::Info, "dropped"));
        handler.handle(&LogRecord::new("t", Severity::Error, "kept"));
        drop(guard);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "kept\n");
    }

    #[test]
    fn test_file_handler_creates_parent_directories() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested/deeper/app.log");
        let config = HandlerConfig::File(FileHandler {
            level: Severity::Debug,
            formatter: None,
            filename: path.clone(),
        });
        let (_handler, _guard) = Handler::build("app", &config, &BTreeMap::new()).unwrap();
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn test_unknown_formatter_reference() {
        let config = HandlerConfig::File(FileHandler {
            level: Severity::Debug,
            formatter: Some("missing".into()),
            filename: "x.log".into(),
        });
        assert!(matches!(
            Handler::build("h", &config, &BTreeMap::new()),
            Err(SetupError::UnknownReference { .. })
        ));
    }

    #[test]
    fn test_multiline_formatter_is_wired_from_spec() {
        let spec = FormatterSpec {
            format: "{levelname} {message}".into(),
            datefmt: None,
            multiline: true,
        };
        let formatter = build_formatter("h", Some(&spec), false).unwrap();
        let out = formatter.format(&LogRecord::new("t", Severity::Info, "a\nb"));
        assert_eq!(out, "INFO a\n     b");
    }
}
