//! Job setup: run directory plus logging, in one call.

use crate::config::{LoggingConfig, resolve_template_path};
use crate::context::LoggingContext;
use crate::error::Result;
use crate::logger::get_logger;
use crate::run_dir::RunDirectory;
use crate::severity::Severity;
use std::path::{Path, PathBuf};

/// Options for [`setup_job_dir`].
#[derive(Debug, Clone)]
pub struct SetupOptions {
    /// Delete an existing run directory with the same identifier first.
    pub remove_existing: bool,
    /// Narrow `info_file_handler` to the console verbosity instead of
    /// logging everything.
    pub restrict_file_to_verbosity: bool,
    /// Logging template; `None` resolves through `RUNLOG_CONFIG` and then the
    /// bundled template.
    pub config_template: Option<PathBuf>,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            remove_existing: true,
            restrict_file_to_verbosity: false,
            config_template: None,
        }
    }
}

/// Load, patch and build the logging configuration for `run_dir` without
/// installing it.
pub fn prepare(
    run_dir: &Path,
    verbosity: i64,
    config_template: &Path,
    restrict_file_to_verbosity: bool,
) -> Result<LoggingContext> {
    let level = Severity::from_verbosity(verbosity)?;
    let mut config = LoggingConfig::load(config_template, level)?;
    config.patch_filenames(run_dir);
    for handler in config.apply_verbosity(level, restrict_file_to_verbosity) {
        println!(
            "Warning: handler {handler} is missing from {}; verbosity not applied.",
            config_template.display()
        );
    }
    LoggingContext::build(&config)
}

/// Configure logging for `run_dir` and install it process-wide.
///
/// A missing template is not an error: a console-only configuration at the
/// requested verbosity is installed instead.
pub fn configure(
    run_dir: &Path,
    verbosity: i64,
    config_template: &Path,
    restrict_file_to_verbosity: bool,
) -> Result<()> {
    prepare(run_dir, verbosity, config_template, restrict_file_to_verbosity)?.install()
}

/// Create the run directory under `output` and route logging into it.
///
/// Returns the run directory path.
pub fn setup_job_dir(
    output: &Path,
    verbosity: i64,
    log_id: Option<&Path>,
    options: SetupOptions,
) -> Result<PathBuf> {
    // Reject a bad verbosity before touching the filesystem.
    Severity::from_verbosity(verbosity)?;

    let run_dir = RunDirectory::initialize(output, log_id, options.remove_existing)?;
    let template = resolve_template_path(options.config_template.as_deref());
    configure(
        run_dir.path(),
        verbosity,
        &template,
        options.restrict_file_to_verbosity,
    )?;

    get_logger().info(format_args!("Setting up logs at {}", run_dir.path().display()));
    Ok(run_dir.into_path())
}
