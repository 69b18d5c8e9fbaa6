//! Log records as seen by formatters.
//!
//! A [`LogRecord`] is built from a `tracing` event at dispatch time. Events
//! emitted through a [`crate::Logger`] carry the logger name, its level and
//! the caller's location as fields; plain `tracing` macros fall back to the
//! event metadata (target, file, line).

use crate::severity::Severity;
use chrono::{DateTime, Local};
use std::fmt::{self, Write as _};
use tracing::Event;
use tracing::field::{Field, Visit};

pub(crate) const LOGGER_FIELD: &str = "logger";
pub(crate) const LOGGER_LEVEL_FIELD: &str = "logger_level";
pub(crate) const FILE_FIELD: &str = "log.file";
pub(crate) const LINE_FIELD: &str = "log.line";

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub name: String,
    pub severity: Severity,
    pub pathname: String,
    pub lineno: u32,
    pub message: String,
    pub created: DateTime<Local>,
    /// Level set on the emitting logger itself, if any.
    pub logger_level: Option<Severity>,
}

impl LogRecord {
    pub fn new(name: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            severity,
            pathname: String::new(),
            lineno: 0,
            message: message.into(),
            created: Local::now(),
            logger_level: None,
        }
    }

    pub fn with_location(mut self, pathname: impl Into<String>, lineno: u32) -> Self {
        self.pathname = pathname.into();
        self.lineno = lineno;
        self
    }

    pub fn with_created(mut self, created: DateTime<Local>) -> Self {
        self.created = created;
        self
    }

    /// Same name, level, location and time, but no message.
    pub fn without_message(&self) -> Self {
        Self {
            message: String::new(),
            ..self.clone()
        }
    }

    /// Final path component of `pathname`.
    pub fn filename(&self) -> &str {
        self.pathname
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.pathname)
    }

    pub fn from_event(event: &Event<'_>) -> Self {
        let metadata = event.metadata();
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let mut message = visitor.message.unwrap_or_default();
        if !visitor.extra.is_empty() {
            if !message.is_empty() {
                message.push(' ');
            }
            message.push_str(&visitor.extra);
        }

        Self {
            name: visitor
                .logger
                .unwrap_or_else(|| metadata.target().to_string()),
            severity: Severity::from(*metadata.level()),
            pathname: visitor
                .file
                .or_else(|| metadata.file().map(str::to_string))
                .unwrap_or_default(),
            lineno: visitor.line.or(metadata.line()).unwrap_or(0),
            message,
            created: Local::now(),
            logger_level: visitor
                .logger_level
                .and_then(|v| Severity::from_verbosity(v).ok()),
        }
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    logger: Option<String>,
    logger_level: Option<i64>,
    file: Option<String>,
    line: Option<u32>,
    extra: String,
}

impl RecordVisitor {
    fn push_extra(&mut self, field: &Field, value: &dyn fmt::Display) {
        if !self.extra.is_empty() {
            self.extra.push(' ');
        }
        let _ = write!(self.extra, "{}={}", field.name(), value);
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = Some(value.to_string()),
            LOGGER_FIELD => self.logger = Some(value.to_string()),
            FILE_FIELD => self.file = Some(value.to_string()),
            _ => self.push_extra(field, &value),
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            LINE_FIELD => self.line = u32::try_from(value).ok(),
            LOGGER_LEVEL_FIELD => self.logger_level = i64::try_from(value).ok(),
            _ => self.push_extra(field, &value),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        match field.name() {
            LINE_FIELD => self.line = u32::try_from(value).ok(),
            LOGGER_LEVEL_FIELD => self.logger_level = Some(value),
            _ => self.push_extra(field, &value),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.push_extra(field, &format_args!("{value:?}"));
        }
    }
}
