//! # runlog CLI
//!
//! Sets up a run directory and logging the same way a job would, then emits
//! one record per severity so every configured handler can be checked. The
//! run directory path is printed on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use runlog::{SetupOptions, Severity, get_logger, setup_job_dir};
use std::path::PathBuf;

/// Create a per-run log directory and route logging into it.
#[derive(Parser, Debug)]
#[command(name = "runlog", version, about)]
struct Cli {
    /// Base output directory; the run directory is created inside it.
    #[arg(long, default_value = "outputs")]
    output: PathBuf,

    /// Console verbosity: 0 errors, 1 warnings, 2 info, 3 debug.
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(i64).range(0..=3))]
    verbosity: i64,

    /// Run identifier; defaults to the current time (yyMMdd_HHmmss).
    #[arg(long)]
    log_id: Option<PathBuf>,

    /// Fail instead of clearing an existing run directory.
    #[arg(long)]
    keep_existing: bool,

    /// Limit the info log file to the console verbosity.
    #[arg(long)]
    restrict_file_level: bool,

    /// Logging configuration template (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Message to log at every severity.
    #[arg(trailing_var_arg = true)]
    message: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = SetupOptions {
        remove_existing: !cli.keep_existing,
        restrict_file_to_verbosity: cli.restrict_file_level,
        config_template: cli.config,
    };
    let run_dir = setup_job_dir(&cli.output, cli.verbosity, cli.log_id.as_deref(), options)
        .with_context(|| format!("Failed to set up run directory under {:?}", cli.output))?;

    let message = if cli.message.is_empty() {
        "runlog is configured".to_string()
    } else {
        cli.message.join(" ")
    };
    let log = get_logger();
    for severity in [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
    ] {
        log.log(severity, &message);
    }

    runlog::utils::logging::shutdown();
    println!("{}", run_dir.display());
    Ok(())
}
