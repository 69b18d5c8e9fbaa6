//! Tests for continuation-line alignment across formatter patterns.

use chrono::{Local, TimeZone};
use runlog::format::FieldStyles;
use runlog::{LogRecord, MultiLineFormatter, PatternFormatter, RecordFormatter, Severity};

fn record(message: &str) -> LogRecord {
    LogRecord::new("trainer", Severity::Info, message)
        .with_location("src/jobs/trainer.rs", 118)
        .with_created(Local.with_ymd_and_hms(2026, 10, 18, 9, 30, 15).unwrap())
}

fn patterns() -> Vec<&'static str> {
    vec![
        "{asctime} - {name} - {levelname} - {message}",
        "{asctime} {name}[{lineno}] {levelname} {message}",
        "[{levelname:^9}] {filename}:{lineno:>5} | {message}",
        "{message}",
    ]
}

#[test]
fn test_continuation_lines_start_with_header_width_spaces() {
    for pattern in patterns() {
        let formatter = MultiLineFormatter::new(PatternFormatter::new(pattern).unwrap());
        let header_len = formatter.format(&record("")).chars().count();
        assert_eq!(formatter.header_len(&record("line1\nline2\nline3")), header_len);

        let out = formatter.format(&record("line1\nline2\nline3"));
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines.len(), 3, "pattern {pattern:?}");

        let first = formatter.inner().format(&record("line1"));
        assert_eq!(lines[0], first, "pattern {pattern:?}");
        for (line, body) in lines[1..].iter().zip(["line2", "line3"]) {
            assert_eq!(*line, format!("{}{body}", " ".repeat(header_len)));
        }
    }
}

#[test]
fn test_single_line_matches_inner_formatter() {
    for pattern in patterns() {
        let formatter = MultiLineFormatter::new(PatternFormatter::new(pattern).unwrap());
        let record = record("one line only");
        assert_eq!(formatter.format(&record), formatter.inner().format(&record));
    }
}

#[test]
fn test_fixed_date_pattern_is_used() {
    let formatter = MultiLineFormatter::new(
        PatternFormatter::new("{asctime} {message}")
            .unwrap()
            .with_date_format("%d/%m/%Y"),
    );
    assert_eq!(formatter.format(&record("m")), "2026-10-18,09:30:15 m");
}

#[test]
fn test_trailer_after_message_counts_as_header() {
    let formatter = MultiLineFormatter::new(PatternFormatter::new("{message} <{name}>").unwrap());
    let out = formatter.format(&record("a\nb"));
    assert_eq!(out, format!("a\n{}b <trainer>", " ".repeat(" <trainer>".len())));
}

#[test]
fn test_styled_output_aligns_on_visible_width() {
    let formatter = MultiLineFormatter::new(
        PatternFormatter::new("{asctime} {levelname} {message}")
            .unwrap()
            .with_styles(FieldStyles::default()),
    );
    let out = formatter.format(&record("a\nb"));
    let continuation = out.split('\n').nth(1).unwrap();
    let indent = continuation.len() - continuation.trim_start_matches(' ').len();
    assert_eq!(indent, "2026-10-18,09:30:15 INFO ".len());
}

#[test]
fn test_formatters_are_usable_as_trait_objects() {
    let formatters: Vec<Box<dyn RecordFormatter>> = vec![
        Box::new(PatternFormatter::new("{levelname} {message}").unwrap()),
        Box::new(MultiLineFormatter::new(
            PatternFormatter::new("{levelname} {message}").unwrap(),
        )),
    ];
    let outputs: Vec<String> = formatters.iter().map(|f| f.format(&record("a\nb"))).collect();
    assert_eq!(outputs[0], "INFO a\nb");
    assert_eq!(outputs[1], "INFO a\n     b");
}
