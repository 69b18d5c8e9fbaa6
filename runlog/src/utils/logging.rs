//! # Global Logging Installation
//!
//! This module owns the process-wide side of logging setup. A
//! [`LoggingContext`] can be used on its own in a scoped way; installing it
//! here makes it the ambient `tracing` subscriber for every thread.
//!
//! ## Core Functionality
//!
//! - **`install()`**: The first call registers a `tracing_subscriber::registry()`
//!   with a reloadable dispatch layer as the global default. Later calls swap
//!   the dispatch layer through the reload handle, so re-running setup replaces
//!   the previous handlers instead of failing.
//!
//! - **Writer guards**: File handlers write through `tracing_appender`
//!   non-blocking workers. Their guards are kept here for as long as the
//!   context is installed and are dropped (flushing their files) when a newer
//!   context replaces it.
//!
//! - **`shutdown()`**: Drops the guards of the installed context so pending
//!   file output is flushed before the process exits. Statics are never
//!   dropped, so binaries call this at the end of `main`.
//!
//! - **`init_test_logging()`**: Installs a verbose console-only configuration
//!   for tests.
//!
//! ## Usage
//!
//! Most callers go through [`crate::setup_job_dir`] or [`crate::configure`].
//! Lower-level callers build a context themselves:
//!
//! ```rust,no_run
//! use runlog::{LoggingConfig, LoggingContext, Severity};
//!
//! let config = LoggingConfig::console_only(Severity::Info);
//! LoggingContext::build(&config)?.install()?;
//! tracing::info!("logging is up");
//! # Ok::<(), runlog::SetupError>(())
//! ```

use crate::config::LoggingConfig;
use crate::context::{DispatchLayer, LoggingContext};
use crate::error::{Result, SetupError};
use crate::severity::Severity;
use std::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{Registry, prelude::*, reload};

struct Installed {
    handle: reload::Handle<DispatchLayer, Registry>,
    guards: Vec<WorkerGuard>,
}

static INSTALLED: Mutex<Option<Installed>> = Mutex::new(None);

/// Initialize verbose logging for tests.
///
/// This configures a `DEBUG`-level console subscriber on stderr.
pub fn init_test_logging() {
    let config = LoggingConfig::console_only(Severity::Debug);
    LoggingContext::build(&config)
        .and_then(LoggingContext::install)
        .expect("Failed to initialize test logging");
}

/// Install `context` as the global subscriber.
///
/// # Errors
///
/// Returns [`SetupError::SubscriberInstall`] when another global subscriber
/// was set outside this crate, or when the reload handle is no longer live.
pub fn install(context: LoggingContext) -> Result<()> {
    let (layer, guards) = context.into_parts();
    let mut installed = INSTALLED.lock().unwrap_or_else(|e| e.into_inner());

    match installed.as_mut() {
        Some(current) => {
            current
                .handle
                .reload(layer)
                .map_err(|e| SetupError::SubscriberInstall(e.to_string()))?;
            // Dropping the old guards flushes the previous file writers.
            current.guards = guards;
        }
        None => {
            let (layer, handle) = reload::Layer::new(layer);
            tracing_subscriber::registry()
                .with(layer)
                .try_init()
                .map_err(|e| SetupError::SubscriberInstall(e.to_string()))?;
            *installed = Some(Installed { handle, guards });
        }
    }
    Ok(())
}

/// Flush and close the file writers of the installed context.
///
/// The dispatch layer stays installed; console handlers keep working, file
/// handlers stop receiving output.
pub fn shutdown() {
    let mut installed = INSTALLED.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(current) = installed.as_mut() {
        drop(std::mem::take(&mut current.guards));
    }
}

/// Whether a context has been installed in this process.
pub fn is_installed() -> bool {
    INSTALLED
        .lock()
        .map(|installed| installed.is_some())
        .unwrap_or(false)
}
