//! # Run Directories
//!
//! Every job invocation writes its logs and artifacts into its own folder,
//! `<base>/<identifier>`. The identifier is either supplied by the caller or
//! generated from the local time at second resolution (`yyMMdd_HHmmss`).
//!
//! Two runs started within the same second without an explicit identifier
//! resolve to the same directory; that collision is not detected.

use crate::error::{Result, SetupError};
use crate::utils::time::run_id_now;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// A created run directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirectory {
    base: PathBuf,
    identifier: PathBuf,
    path: PathBuf,
}

impl RunDirectory {
    /// Create (or recreate) `base/identifier` and return it.
    ///
    /// With `remove_if_exists`, an existing directory is deleted with all of
    /// its contents first. Without it, an existing directory is an error and
    /// is left untouched.
    pub fn initialize(
        base: &Path,
        identifier: Option<&Path>,
        remove_if_exists: bool,
    ) -> Result<Self> {
        if !base.exists() {
            fs::create_dir_all(base).map_err(|e| SetupError::io(base, e))?;
        }

        let identifier = match identifier {
            Some(id) => validate_identifier(id)?,
            None => PathBuf::from(run_id_now()),
        };
        let path = base.join(&identifier);

        if path.is_dir() && remove_if_exists {
            fs::remove_dir_all(&path).map_err(|e| SetupError::io(&path, e))?;
        }

        if remove_if_exists {
            fs::create_dir_all(&path).map_err(|e| SetupError::io(&path, e))?;
        } else {
            if path.exists() {
                return Err(SetupError::DirectoryAlreadyExists { path });
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| SetupError::io(parent, e))?;
            }
            fs::create_dir(&path).map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => SetupError::DirectoryAlreadyExists {
                    path: path.clone(),
                },
                _ => SetupError::io(&path, e),
            })?;
        }

        Ok(Self {
            base: base.to_path_buf(),
            identifier,
            path,
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn identifier(&self) -> &Path {
        &self.identifier
    }

    /// The resolved `base/identifier` path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl AsRef<Path> for RunDirectory {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Only relative, non-escaping paths can name a subdirectory of the base.
fn validate_identifier(identifier: &Path) -> Result<PathBuf> {
    let mut normal = 0usize;
    for component in identifier.components() {
        match component {
            Component::Normal(_) => normal += 1,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(SetupError::InvalidIdentifierKind {
                    identifier: identifier.to_path_buf(),
                });
            }
        }
    }
    if normal == 0 {
        return Err(SetupError::InvalidIdentifierKind {
            identifier: identifier.to_path_buf(),
        });
    }
    Ok(identifier.to_path_buf())
}
