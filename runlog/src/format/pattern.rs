//! Template-driven formatter.
//!
//! Patterns are plain text with `{field}` placeholders. Supported fields are
//! `asctime`, `levelname`, `name`, `message`, `filename`, `pathname` and
//! `lineno`. A placeholder may carry an alignment, `{levelname:<8}`,
//! `{lineno:>4}` or `{name:^12}`. Literal braces are written `{{` and `}}`.

use super::RecordFormatter;
use crate::record::LogRecord;
use crate::severity::Severity;
use crate::utils::time::{DEFAULT_DATE_FORMAT, format_timestamp};
use owo_colors::{OwoColorize, Style};
use std::fmt::Write as _;
use thiserror::Error;

pub const DEFAULT_PATTERN: &str = "{asctime} - {name} - {levelname} - {message}";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("unknown placeholder '{{{0}}}'")]
    UnknownField(String),

    #[error("placeholder opened at byte {0} is never closed")]
    UnclosedPlaceholder(usize),

    #[error("unmatched '}}' at byte {0}")]
    UnmatchedBrace(usize),

    #[error("invalid alignment '{0}'")]
    BadAlignment(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Asctime,
    Levelname,
    Name,
    Message,
    Filename,
    Pathname,
    Lineno,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "asctime" => Field::Asctime,
            "levelname" => Field::Levelname,
            "name" => Field::Name,
            "message" => Field::Message,
            "filename" => Field::Filename,
            "pathname" => Field::Pathname,
            "lineno" => Field::Lineno,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field {
        field: Field,
        align: Option<(Align, usize)>,
    },
}

/// Console styles applied per field when color is enabled.
#[derive(Debug, Clone, Copy)]
pub struct FieldStyles {
    pub asctime: Style,
    pub name: Style,
    pub levelname: Style,
    pub debug: Option<Style>,
    pub info: Option<Style>,
    pub warning: Option<Style>,
    pub error: Option<Style>,
}

impl Default for FieldStyles {
    fn default() -> Self {
        Self {
            asctime: Style::new().green(),
            name: Style::new().blue(),
            levelname: Style::new().magenta().bold(),
            debug: Some(Style::new().green()),
            info: None,
            warning: Some(Style::new().yellow()),
            error: Some(Style::new().red()),
        }
    }
}

impl FieldStyles {
    fn message_style(&self, severity: Severity) -> Option<Style> {
        match severity {
            Severity::Debug => self.debug,
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatternFormatter {
    pattern: String,
    segments: Vec<Segment>,
    date_format: String,
    styles: Option<FieldStyles>,
}

impl Default for PatternFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN).expect("default pattern parses")
    }
}

impl PatternFormatter {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: pattern.to_string(),
            segments: parse_pattern(pattern)?,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            styles: None,
        })
    }

    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = pattern.into();
        self
    }

    pub fn with_styles(mut self, styles: FieldStyles) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn is_styled(&self) -> bool {
        self.styles.is_some()
    }

    fn render_field(&self, field: Field, record: &LogRecord) -> String {
        match field {
            Field::Asctime => format_timestamp(&record.created, &self.date_format),
            Field::Levelname => record.severity.name().to_string(),
            Field::Name => record.name.clone(),
            Field::Message => record.message.clone(),
            Field::Filename => record.filename().to_string(),
            Field::Pathname => record.pathname.clone(),
            Field::Lineno => record.lineno.to_string(),
        }
    }

    fn field_style(&self, field: Field, record: &LogRecord) -> Option<Style> {
        let styles = self.styles.as_ref()?;
        match field {
            Field::Asctime => Some(styles.asctime),
            Field::Name => Some(styles.name),
            Field::Levelname => Some(styles.levelname),
            Field::Message => styles.message_style(record.severity),
            _ => None,
        }
    }
}

impl RecordFormatter for PatternFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { field, align } => {
                    let value = self.render_field(*field, record);
                    let value = match align {
                        Some((align, width)) => pad(&value, *align, *width),
                        None => value,
                    };
                    match self.field_style(*field, record) {
                        Some(style) if !value.is_empty() => {
                            let _ = write!(out, "{}", value.style(style));
                        }
                        _ => out.push_str(&value),
                    }
                }
            }
        }
        out
    }

    fn set_date_format(&mut self, pattern: &str) {
        self.date_format = pattern.to_string();
    }
}

fn pad(value: &str, align: Align, width: usize) -> String {
    match align {
        Align::Left => format!("{value:<width$}"),
        Align::Right => format!("{value:>width$}"),
        Align::Center => format!("{value:^width$}"),
    }
}

fn parse_pattern(pattern: &str) -> Result<Vec<Segment>, PatternError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                literal.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err(PatternError::UnmatchedBrace(pos)),
            '{' => {
                let mut spec = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    spec.push(c);
                }
                if !closed {
                    return Err(PatternError::UnclosedPlaceholder(pos));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(parse_placeholder(&spec)?);
            }
            c => literal.push(c),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn parse_placeholder(spec: &str) -> Result<Segment, PatternError> {
    let (name, align) = match spec.split_once(':') {
        Some((name, align)) => (name.trim(), Some(parse_alignment(align)?)),
        None => (spec.trim(), None),
    };
    let field = Field::parse(name).ok_or_else(|| PatternError::UnknownField(name.to_string()))?;
    Ok(Segment::Field { field, align })
}

fn parse_alignment(spec: &str) -> Result<(Align, usize), PatternError> {
    let (align, width) = match spec.chars().next() {
        Some('<') => (Align::Left, &spec[1..]),
        Some('>') => (Align::Right, &spec[1..]),
        Some('^') => (Align::Center, &spec[1..]),
        _ => (Align::Left, spec),
    };
    let width = width
        .parse::<usize>()
        .map_err(|_| PatternError::BadAlignment(spec.to_string()))?;
    Ok((align, width))
}
