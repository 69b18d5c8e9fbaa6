//! Tests for template loading, patching and dispatch through a scoped
//! subscriber.
//!
//! Nothing here installs a global subscriber; each test drives its own
//! context with `tracing::subscriber::with_default`.

use runlog::config::{CONSOLE_HANDLER, INFO_FILE_HANDLER};
use runlog::{LogRecord, LoggingContext, RunDirectory, SetupError, Severity, get_logger, prepare};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

const TEMPLATE: &str = r#"{
    "formatters": {
        "plain": {"format": "{levelname} {name} {message}", "multiline": true}
    },
    "handlers": {
        "console": {"kind": "console", "level": "DEBUG", "formatter": "plain", "color": "never"},
        "info_file_handler": {"kind": "rotating_file", "level": "DEBUG", "formatter": "plain",
                              "filename": "info.log", "rotation": "never"},
        "error_file_handler": {"kind": "file", "level": "ERROR", "formatter": "plain",
                               "filename": "errors.log"}
    },
    "root": {"level": "DEBUG", "handlers": ["console", "info_file_handler", "error_file_handler"]}
}"#;

struct Fixture {
    _temp: TempDir,
    template: PathBuf,
    run: RunDirectory,
}

fn fixture() -> Fixture {
    let temp = tempdir().unwrap();
    let template = temp.path().join("logger_config.json");
    fs::write(&template, TEMPLATE).unwrap();
    let run = RunDirectory::initialize(&temp.path().join("outputs"), Some(Path::new("run1")), true)
        .unwrap();
    Fixture {
        _temp: temp,
        template,
        run,
    }
}

fn emit_samples(context: &LoggingContext) {
    tracing::subscriber::with_default(context.subscriber(), || {
        let log = get_logger();
        log.debug("debug line");
        log.info("first\nsecond");
        log.error("boom");
        tracing::warn!(target: "jobs::train", "from tracing");
    });
}

#[test]
fn test_console_threshold_follows_verbosity() {
    let f = fixture();
    for verbosity in 0..=3 {
        let context = prepare(f.run.path(), verbosity, &f.template, false).unwrap();
        assert_eq!(
            context.handler(CONSOLE_HANDLER).unwrap().level(),
            Severity::from_verbosity(verbosity).unwrap()
        );
        assert_eq!(
            context.handler(INFO_FILE_HANDLER).unwrap().level(),
            Severity::Debug
        );
    }
}

#[test]
fn test_invalid_verbosity() {
    let f = fixture();
    for verbosity in [-1, 4] {
        assert!(matches!(
            prepare(f.run.path(), verbosity, &f.template, false),
            Err(SetupError::InvalidVerbosity(v)) if v == verbosity
        ));
    }
}

#[test]
fn test_missing_template_builds_console_only_context() {
    let f = fixture();
    let missing = f.run.path().join("does-not-exist.json");
    let context = prepare(f.run.path(), 1, &missing, false).unwrap();
    assert_eq!(context.handlers().len(), 1);
    assert_eq!(
        context.handler(CONSOLE_HANDLER).unwrap().level(),
        Severity::Warning
    );
    assert_eq!(fs::read_dir(f.run.path()).unwrap().count(), 0);
}

#[test]
fn test_malformed_template_is_fatal() {
    let f = fixture();
    fs::write(&f.template, r#"{"handlers": {"console": {"kind": "console", "level": "LOUD"}}}"#)
        .unwrap();
    assert!(matches!(
        prepare(f.run.path(), 2, &f.template, false),
        Err(SetupError::ConfigParse { .. })
    ));
}

#[test]
fn test_file_handlers_write_inside_run_directory() {
    let f = fixture();
    let context = prepare(f.run.path(), 0, &f.template, false).unwrap();
    emit_samples(&context);
    drop(context);

    let info = fs::read_to_string(f.run.path().join("info.log")).unwrap();
    let header = "INFO configure_test ";
    assert!(info.contains("DEBUG configure_test debug line\n"));
    assert!(info.contains(&format!("{header}first\n{}second\n", " ".repeat(header.len()))));
    assert!(info.contains("ERROR configure_test boom\n"));
    assert!(info.contains("WARNING jobs::train from tracing\n"));

    let errors = fs::read_to_string(f.run.path().join("errors.log")).unwrap();
    assert_eq!(errors, "ERROR configure_test boom\n");
}

#[test]
fn test_restricted_file_handler_follows_verbosity() {
    let f = fixture();
    let context = prepare(f.run.path(), 1, &f.template, true).unwrap();
    assert_eq!(
        context.handler(INFO_FILE_HANDLER).unwrap().level(),
        Severity::Warning
    );
    emit_samples(&context);
    drop(context);

    let info = fs::read_to_string(f.run.path().join("info.log")).unwrap();
    assert!(!info.contains("debug line"));
    assert!(!info.contains("first"));
    assert!(info.contains("ERROR configure_test boom"));
    assert!(info.contains("WARNING jobs::train from tracing"));
}

#[test]
fn test_direct_dispatch_uses_routing() {
    let f = fixture();
    let context = prepare(f.run.path(), 3, &f.template, false).unwrap();
    context.dispatch(&LogRecord::new("direct", Severity::Error, "sent without tracing"));
    drop(context);

    let errors = fs::read_to_string(f.run.path().join("errors.log")).unwrap();
    assert_eq!(errors, "ERROR direct sent without tracing\n");
}

#[test]
fn test_trace_events_never_reach_debug_handlers() {
    let f = fixture();
    let context = prepare(f.run.path(), 3, &f.template, false).unwrap();
    tracing::subscriber::with_default(context.subscriber(), || {
        tracing::trace!("trace-level event");
        tracing::debug!("debug-level event");
    });
    drop(context);

    let info = fs::read_to_string(f.run.path().join("info.log")).unwrap();
    assert!(!info.contains("trace-level event"));
    assert!(info.contains("DEBUG configure_test debug-level event\n"));
}

#[test]
fn test_unknown_date_specifier_is_rejected_before_logging() {
    let f = fixture();
    fs::write(
        &f.template,
        r#"{
            "formatters": {"dated": {"format": "{asctime} {message}", "datefmt": "%Q"}},
            "handlers": {"console": {"kind": "console", "formatter": "dated"}},
            "root": {"handlers": ["console"]}
        }"#,
    )
    .unwrap();
    assert!(matches!(
        prepare(f.run.path(), 2, &f.template, false),
        Err(SetupError::InvalidFormat { formatter, .. }) if formatter == "dated"
    ));
}
