//! Symlink action.
use std::path::{Path, PathBuf};

use super::Operation;
use super::fs::{check_same_kind, ensure_parent_dir, is_real_dir, remove_existing};
use crate::error::ActionError;

/// Link a destination path to a file or directory in the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkAction {
    /// The profile entry the link points to (absolute).
    pub source: PathBuf,
    /// Where the link is created.
    pub destination: PathBuf,
}

impl SymlinkAction {
    /// Create a new symlink action.
    #[must_use]
    pub const fn new(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
        }
    }
}

impl Operation for SymlinkAction {
    fn description(&self) -> String {
        format!("{} -> {}", self.source.display(), self.destination.display())
    }

    fn prepare(&self) -> Result<(), ActionError> {
        if is_real_dir(&self.destination) {
            return Err(ActionError::DirectoryConflict(self.destination.clone()));
        }
        if !self.source.exists() {
            return Err(ActionError::SourceNotFound(self.source.clone()));
        }
        check_same_kind(&self.source, &self.destination)?;
        ensure_parent_dir(&self.destination)
    }

    fn execute(&self) -> Result<(), ActionError> {
        remove_existing(&self.destination)?;
        create_symlink(&self.source, &self.destination)
    }
}

/// Create a symlink at `link` pointing to `target`.
#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> Result<(), ActionError> {
    std::os::unix::fs::symlink(target, link).map_err(|source| ActionError::Io {
        op: "create symlink",
        path: link.to_path_buf(),
        source,
    })
}

#[cfg(not(unix))]
fn create_symlink(_target: &Path, _link: &Path) -> Result<(), ActionError> {
    Err(ActionError::SymlinkUnsupported)
}
