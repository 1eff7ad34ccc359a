//! Copy action.
use std::path::PathBuf;

use super::Operation;
use super::fs::{
    check_same_kind, copy_dir_recursive, ensure_parent_dir, is_symlink, remove_existing,
};
use crate::error::ActionError;

/// Copy a file, or merge a directory, from the profile to its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyAction {
    /// File or directory inside the profile.
    pub source: PathBuf,
    /// Where the copy ends up.
    pub destination: PathBuf,
}

impl CopyAction {
    /// Create a new copy action.
    #[must_use]
    pub const fn new(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
        }
    }
}

impl Operation for CopyAction {
    fn description(&self) -> String {
        format!("{} -> {}", self.source.display(), self.destination.display())
    }

    fn prepare(&self) -> Result<(), ActionError> {
        if !self.source.exists() {
            return Err(ActionError::SourceNotFound(self.source.clone()));
        }
        check_same_kind(&self.source, &self.destination)?;
        ensure_parent_dir(&self.destination)
    }

    fn execute(&self) -> Result<(), ActionError> {
        if self.source.is_dir() {
            if is_symlink(&self.destination) {
                remove_existing(&self.destination)?;
            }
            copy_dir_recursive(&self.source, &self.destination)
        } else {
            remove_existing(&self.destination)?;
            std::fs::copy(&self.source, &self.destination).map_err(|source| ActionError::Io {
                op: "copy",
                path: self.source.clone(),
                source,
            })?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    const CONTENT: &str = "hello world\n";

    fn copy(source: PathBuf, destination: PathBuf) -> CopyAction {
        CopyAction::new(source, destination)
    }

    #[test]
    fn description_lists_source_then_destination() {
        let action = copy(PathBuf::from("/a"), PathBuf::from("/b"));
        assert_eq!(action.description(), "/a -> /b");
    }

    #[test]
    fn copies_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("foo");
        let dest = dir.path().join("bar");
        fs::write(&src, CONTENT).unwrap();

        let action = copy(src, dest.clone());
        action.prepare().unwrap();
        action.execute().unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), CONTENT);
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("foo");
        let dest = dir.path().join("bar");
        fs::write(&src, CONTENT).unwrap();
        fs::write(&dest, "\n").unwrap();

        let action = copy(src, dest.clone());
        action.prepare().unwrap();
        action.execute().unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), CONTENT);
    }

    #[test]
    fn copies_directory_then_merges() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in");
        let dest = dir.path().join("out");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("a"), CONTENT).unwrap();

        let action = copy(src.clone(), dest.clone());
        action.prepare().unwrap();
        assert!(!dest.exists());
        action.execute().unwrap();
        assert_eq!(fs::read_to_string(dest.join("a")).unwrap(), CONTENT);

        // Second round: new file in the source, unrelated file in the destination.
        fs::write(src.join("b"), CONTENT).unwrap();
        fs::write(dest.join("local"), "mine").unwrap();
        let action = copy(src, dest.clone());
        action.prepare().unwrap();
        assert!(!dest.join("b").exists());
        action.execute().unwrap();
        assert_eq!(fs::read_to_string(dest.join("a")).unwrap(), CONTENT);
        assert_eq!(fs::read_to_string(dest.join("b")).unwrap(), CONTENT);
        assert_eq!(fs::read_to_string(dest.join("local")).unwrap(), "mine");
    }

    #[test]
    fn prepare_creates_parent_without_touching_destination() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("foo");
        let new = dir.path().join("new");
        let dest = new.join("file");
        fs::write(&src, CONTENT).unwrap();

        let action = copy(src, dest.clone());
        action.prepare().unwrap();
        assert!(new.is_dir());
        assert!(!dest.exists());

        action.execute().unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), CONTENT);
    }

    #[test]
    fn missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let action = copy(dir.path().join("missing"), dir.path().join("dest"));
        let err = action.prepare().unwrap_err();
        assert!(matches!(err, ActionError::SourceNotFound(_)));
        assert!(err.to_string().contains("missing does not exist"));
    }

    #[test]
    fn directory_over_file_is_type_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in");
        let dest = dir.path().join("bar");
        fs::create_dir(&src).unwrap();
        fs::write(&dest, CONTENT).unwrap();

        let err = copy(src, dest).prepare().unwrap_err();
        assert!(matches!(err, ActionError::TypeMismatch { .. }));
    }

    #[test]
    fn file_over_directory_is_type_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("foo");
        let dest = dir.path().join("out");
        fs::write(&src, CONTENT).unwrap();
        fs::create_dir(&dest).unwrap();

        let err = copy(src, dest.clone()).prepare().unwrap_err();
        assert!(matches!(err, ActionError::TypeMismatch { .. }));
        assert!(dest.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn replaces_symlink_with_file_copy() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("foo");
        let other = dir.path().join("other");
        let dest = dir.path().join("link");
        fs::write(&src, CONTENT).unwrap();
        fs::write(&other, "other").unwrap();
        std::os::unix::fs::symlink(&other, &dest).unwrap();

        let action = copy(src, dest.clone());
        action.prepare().unwrap();
        action.execute().unwrap();
        assert!(!is_symlink(&dest));
        assert_eq!(fs::read_to_string(&dest).unwrap(), CONTENT);
        assert_eq!(fs::read_to_string(&other).unwrap(), "other");
    }

    #[cfg(unix)]
    #[test]
    fn replaces_symlinked_directory_with_real_directory() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in");
        let linked = dir.path().join("linked");
        let dest = dir.path().join("out");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("a"), CONTENT).unwrap();
        fs::create_dir(&linked).unwrap();
        std::os::unix::fs::symlink(&linked, &dest).unwrap();

        let action = copy(src, dest.clone());
        action.prepare().unwrap();
        action.execute().unwrap();
        assert!(!is_symlink(&dest));
        assert!(dest.join("a").is_file());
        assert!(!linked.join("a").exists());
    }
}
