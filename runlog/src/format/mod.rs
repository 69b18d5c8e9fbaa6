//! # Record Formatting
//!
//! Formatters turn a [`LogRecord`] into the text a handler writes. Every
//! formatter implements [`RecordFormatter`], so wrappers such as
//! [`MultiLineFormatter`] compose with any inner formatter instead of
//! overriding one.
//!
//! - [`PatternFormatter`]: renders a `{field}` template, optionally with
//!   console styling.
//! - [`MultiLineFormatter`]: indents continuation lines of multi-line messages
//!   so they line up under the end of the header.

pub mod multiline;
pub mod pattern;

pub use multiline::MultiLineFormatter;
pub use pattern::{FieldStyles, PatternFormatter};

use crate::record::LogRecord;

/// Anything that can render a record to a single string (without the
/// trailing newline; handlers add it).
pub trait RecordFormatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> String;

    /// Render timestamps with `pattern` from now on. Formatters that print no
    /// timestamp ignore it.
    fn set_date_format(&mut self, _pattern: &str) {}
}

impl<F: RecordFormatter + ?Sized> RecordFormatter for Box<F> {
    fn format(&self, record: &LogRecord) -> String {
        (**self).format(record)
    }

    fn set_date_format(&mut self, pattern: &str) {
        (**self).set_date_format(pattern)
    }
}

/// Width of `text` in characters, not counting ANSI SGR escape sequences.
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' && chars.peek() == Some(&'[') {
            chars.next();
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}
