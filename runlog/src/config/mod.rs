//! # Logging Configuration
//!
//! A logging configuration is read from a JSON template, adjusted for the
//! current run and then handed to [`crate::context::LoggingContext::build`].
//!
//! ```text
//! logger_config.json
//!     → LoggingConfig::load (parse, or console-only fallback when missing)
//!     → patch_filenames (file handlers now write inside the run directory)
//!     → apply_verbosity (console, and optionally info_file_handler, levels)
//!     → validate (formatter and handler references resolve)
//! ```
//!
//! The template path is resolved as: explicit argument, then the
//! `RUNLOG_CONFIG` environment variable, then the `logger_config.json`
//! bundled with this crate. A copy of the bundled template is compiled into
//! the binary and used when that file is no longer on disk.

pub mod schema;

pub use schema::{
    ColorChoice, ConsoleHandler, FileHandler, FormatterSpec, HandlerConfig, LoggerBinding,
    LoggingConfig, RotatingFileHandler, Rotation, Stream, CONSOLE_HANDLER, INFO_FILE_HANDLER,
};

use crate::error::{Result, SetupError};
use crate::severity::Severity;
use crate::utils::time::is_valid_date_format;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the bundled template path.
pub const CONFIG_ENV_VAR: &str = "RUNLOG_CONFIG";

/// Contents of the bundled `logger_config.json`.
pub const BUNDLED_TEMPLATE: &str = include_str!("../../logger_config.json");

/// The template shipped next to this crate's manifest.
pub fn bundled_template_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("logger_config.json")
}

/// Parse the compiled-in copy of the bundled template.
pub fn bundled_template() -> Result<LoggingConfig> {
    serde_json::from_str(BUNDLED_TEMPLATE).map_err(|source| SetupError::ConfigParse {
        path: bundled_template_path(),
        source,
    })
}

/// Resolve which template to load.
pub fn resolve_template_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => bundled_template_path(),
    }
}

/// Read a JSON file into any deserializable type.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| SetupError::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| SetupError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

impl LoggingConfig {
    /// Load `path`, or fall back to [`LoggingConfig::console_only`] with a
    /// warning on stdout when the file does not exist.
    ///
    /// The bundled template path is the exception: when the installed binary
    /// no longer sees the source tree, the compiled-in copy is used.
    pub fn load(path: &Path, fallback_level: Severity) -> Result<Self> {
        if !path.is_file() && path == bundled_template_path() {
            let config = bundled_template()?;
            config.validate()?;
            return Ok(config);
        }
        if !path.is_file() {
            println!(
                "Warning: logging configuration file is not found in {}.",
                path.display()
            );
            return Ok(Self::console_only(fallback_level));
        }
        let config: Self = read_json(path)?;
        config.validate()?;
        Ok(config)
    }

    /// A single console handler at `level`, bound to the root logger.
    pub fn console_only(level: Severity) -> Self {
        let mut config = Self::default();
        config.formatters.insert(
            "simple".to_string(),
            FormatterSpec {
                format: "{levelname}:{name}:{message}".to_string(),
                ..FormatterSpec::default()
            },
        );
        config.handlers.insert(
            CONSOLE_HANDLER.to_string(),
            HandlerConfig::Console(ConsoleHandler {
                level,
                formatter: Some("simple".to_string()),
                stream: Stream::Stderr,
                color: ColorChoice::Auto,
            }),
        );
        config.root = Some(LoggerBinding {
            level: Some(level),
            handlers: vec![CONSOLE_HANDLER.to_string()],
            propagate: true,
        });
        config
    }

    /// Point every file handler at `run_dir/<its filename>`.
    pub fn patch_filenames(&mut self, run_dir: &Path) {
        for (name, handler) in &mut self.handlers {
            if let Some(filename) = handler.filename_mut() {
                let patched = run_dir.join(&*filename);
                debug!(handler = %name, path = %patched.display(), "patched handler filename");
                *filename = patched;
            }
        }
    }

    /// Set the console threshold to `level`; with `restrict_file`, also the
    /// info file handler's.
    ///
    /// Returns the handler names that should have been adjusted but are not
    /// declared in the template.
    pub fn apply_verbosity(&mut self, level: Severity, restrict_file: bool) -> Vec<&'static str> {
        let mut targets = vec![CONSOLE_HANDLER];
        if restrict_file {
            targets.push(INFO_FILE_HANDLER);
        }

        let mut missing = Vec::new();
        for name in targets {
            match self.handlers.get_mut(name) {
                Some(handler) => handler.set_level(level),
                None => missing.push(name),
            }
        }
        missing
    }

    /// Check that every formatter, handler and pattern reference resolves.
    pub fn validate(&self) -> Result<()> {
        for (name, spec) in &self.formatters {
            crate::format::PatternFormatter::new(&spec.format).map_err(|e| {
                SetupError::InvalidFormat {
                    formatter: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            if let Some(datefmt) = &spec.datefmt
                && !is_valid_date_format(datefmt)
            {
                return Err(SetupError::InvalidFormat {
                    formatter: name.clone(),
                    reason: format!("unsupported date format `{datefmt}`"),
                });
            }
        }
        for (name, handler) in &self.handlers {
            if let Some(formatter) = handler.formatter()
                && !self.formatters.contains_key(formatter)
            {
                return Err(SetupError::UnknownReference {
                    kind: "formatter",
                    name: formatter.to_string(),
                    referenced_by: name.clone(),
                });
            }
        }
        let bindings = self
            .loggers
            .iter()
            .map(|(name, binding)| (name.as_str(), binding))
            .chain(self.root.iter().map(|binding| ("root", binding)));
        for (name, binding) in bindings {
            for handler in &binding.handlers {
                if !self.handlers.contains_key(handler) {
                    return Err(SetupError::UnknownReference {
                        kind: "handler",
                        name: handler.clone(),
                        referenced_by: name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
