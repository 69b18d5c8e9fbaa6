//! # runlog
//!
//! Per-run log directories and JSON-configured, multi-destination logging on
//! top of `tracing`.
//!
//! A job calls [`setup_job_dir`] once at startup. It creates
//! `<output>/<run id>/`, loads the logging template, points every file handler
//! into that directory, sets the console threshold from a 0–3 verbosity and
//! installs the result as the global `tracing` subscriber.
//!
//! ## Modules
//!
//! *   **`run_dir`**: creates (and optionally clears) the run directory.
//! *   **`config`**: the typed JSON template and its run-specific patching.
//! *   **`context`** / **`handler`**: live handlers, logger routing, and the
//!     `tracing` layer that feeds them.
//! *   **`format`**: pattern formatting with console styles, and the
//!     multi-line formatter that aligns continuation lines under the header.
//! *   **`logger`**: file-named logger handles.
//!
//! ## Example
//!
//! ```rust,no_run
//! use runlog::{SetupOptions, get_logger, setup_job_dir};
//! use std::path::Path;
//!
//! let run_dir = setup_job_dir(Path::new("outputs"), 2, None, SetupOptions::default())?;
//! let log = get_logger();
//! log.info(format_args!("writing artifacts to {}", run_dir.display()));
//! log.warning("loss diverged\nrestarting from checkpoint 12");
//! # Ok::<(), runlog::SetupError>(())
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod handler;
pub mod logger;
pub mod record;
pub mod run_dir;
pub mod setup;
pub mod severity;
pub mod utils;

pub use config::{HandlerConfig, LoggingConfig};
pub use context::LoggingContext;
pub use error::{Result, SetupError};
pub use format::{MultiLineFormatter, PatternFormatter, RecordFormatter};
pub use logger::{Logger, get_logger};
pub use record::LogRecord;
pub use run_dir::RunDirectory;
pub use setup::{SetupOptions, configure, prepare, setup_job_dir};
pub use severity::Severity;
