//! Continuation-line alignment.
//!
//! ```text
//! 2026-10-18,09:30:15 - train - INFO - epoch 3 finished
//!                                      loss: 0.214
//!                                      accuracy: 0.93
//! ```
//!
//! The header width is measured by rendering the record with an empty
//! message. Patterns that place text after `{message}` therefore count that
//! trailer as part of the header.
//!
//! Lines end at `\n`, `\r\n`, a lone `\r`, and the other Unicode line
//! boundaries (`\x0b`, `\x0c`, `\x1c`..`\x1e`, `\u{85}`, `\u{2028}`, `\u{2029}`).
//! Terminators stay on the line they end.

use super::{RecordFormatter, visible_width};
use crate::record::LogRecord;
use crate::utils::time::MULTILINE_DATE_FORMAT;

/// Wraps an inner formatter and indents every line after the first by the
/// width of the record's header.
#[derive(Debug, Clone)]
pub struct MultiLineFormatter<F> {
    inner: F,
}

impl<F: RecordFormatter> MultiLineFormatter<F> {
    /// Timestamps of `inner` are switched to `%Y-%m-%d,%H:%M:%S`.
    pub fn new(mut inner: F) -> Self {
        inner.set_date_format(MULTILINE_DATE_FORMAT);
        Self { inner }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Visible width of everything the inner formatter emits for `record`
    /// when its message is empty.
    pub fn header_len(&self, record: &LogRecord) -> usize {
        visible_width(&self.inner.format(&record.without_message()))
    }
}

impl<F: RecordFormatter> RecordFormatter for MultiLineFormatter<F> {
    fn format(&self, record: &LogRecord) -> String {
        let rendered = self.inner.format(record);
        let mut lines = lines_inclusive(&rendered);
        let Some(head) = lines.next() else {
            drop(lines);
            return rendered;
        };

        let indent = " ".repeat(self.header_len(record));
        let mut out = String::with_capacity(rendered.len());
        out.push_str(head);
        for line in lines {
            out.push_str(&indent);
            out.push_str(line);
        }
        out
    }

    /// The multi-line date pattern is fixed.
    fn set_date_format(&mut self, _pattern: &str) {}
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split after each line boundary; `\r\n` counts as one.
fn lines_inclusive(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = match rest.char_indices().find(|&(_, c)| is_line_break(c)) {
            Some((i, '\r')) if rest[i + 1..].starts_with('\n') => i + 2,
            Some((i, c)) => i + c.len_utf8(),
            None => rest.len(),
        };
        let (line, tail) = rest.split_at(end);
        rest = tail;
        Some(line)
    })
}
