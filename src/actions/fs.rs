//! File-system helpers shared by the copy and symlink actions.
use std::fs;
use std::path::Path;

use crate::error::ActionError;

fn io_err(op: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> ActionError {
    let path = path.to_path_buf();
    move |source| ActionError::Io { op, path, source }
}

/// Whether `path` is a symlink (dangling or not).
pub fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.is_symlink())
}

/// Whether `path` is a real directory, not a symlink to one.
pub fn is_real_dir(path: &Path) -> bool {
    path.symlink_metadata()
        .is_ok_and(|m| m.is_dir() && !m.is_symlink())
}

/// Fail if `destination` exists as a real file or directory whose kind
/// differs from `source`.
///
/// A symlink at the destination is always replaceable.
///
/// # Errors
///
/// Returns [`ActionError::TypeMismatch`] when the kinds differ.
pub fn check_same_kind(source: &Path, destination: &Path) -> Result<(), ActionError> {
    if let Ok(meta) = destination.symlink_metadata()
        && !meta.is_symlink()
        && meta.is_dir() != source.is_dir()
    {
        return Err(ActionError::TypeMismatch {
            src: source.to_path_buf(),
            dest: destination.to_path_buf(),
        });
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<(), ActionError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err("create parent", parent))?;
    }
    Ok(())
}

/// Remove an existing file or symlink at `path`, including broken symlinks.
///
/// Does nothing if `path` does not exist.  Real directories are never
/// removed; attempting it is an error.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<(), ActionError> {
    if path.symlink_metadata().is_ok() {
        fs::remove_file(path).map_err(io_err("remove existing", path))?;
    }
    Ok(())
}

/// Recursively merge the directory `src` into `dst`.
///
/// Entries already in `dst` that do not exist in `src` are left alone;
/// overlapping files are overwritten.  Symlinks found at a destination entry
/// are replaced rather than written through.  Symlinks within the source
/// tree are followed, so their contents are copied.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or read, or a file
/// cannot be copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<(), ActionError> {
    fs::create_dir_all(dst).map_err(io_err("create directory", dst))?;
    for entry in fs::read_dir(src).map_err(io_err("read directory", src))? {
        let entry = entry.map_err(io_err("read entry in", src))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if is_symlink(&dst_path) {
            remove_existing(&dst_path)?;
        }
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path).map_err(io_err("copy", &src_path))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn copies_files_and_subdirectories() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        fs::write(src.path().join("a.txt"), b"aaa").unwrap();
        fs::create_dir(src.path().join("sub")).unwrap();
        fs::write(src.path().join("sub/b.txt"), b"bbb").unwrap();

        let target = dst.path().join("out");
        copy_dir_recursive(src.path(), &target).unwrap();

        assert_eq!(fs::read(target.join("a.txt")).unwrap(), b"aaa");
        assert_eq!(fs::read(target.join("sub/b.txt")).unwrap(), b"bbb");
    }

    #[test]
    fn merge_keeps_siblings_and_overwrites_overlap() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        fs::write(src.path().join("shared"), b"new").unwrap();
        fs::write(dst.path().join("shared"), b"old").unwrap();
        fs::write(dst.path().join("sibling"), b"keep").unwrap();

        copy_dir_recursive(src.path(), dst.path()).unwrap();

        assert_eq!(fs::read(dst.path().join("shared")).unwrap(), b"new");
        assert_eq!(fs::read(dst.path().join("sibling")).unwrap(), b"keep");
    }

    #[cfg(unix)]
    #[test]
    fn merge_replaces_destination_symlink_instead_of_writing_through() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();

        let outside = elsewhere.path().join("outside");
        fs::write(&outside, b"untouched").unwrap();
        fs::write(src.path().join("file"), b"copied").unwrap();
        std::os::unix::fs::symlink(&outside, dst.path().join("file")).unwrap();

        copy_dir_recursive(src.path(), dst.path()).unwrap();

        assert!(!is_symlink(&dst.path().join("file")));
        assert_eq!(fs::read(dst.path().join("file")).unwrap(), b"copied");
        assert_eq!(fs::read(&outside).unwrap(), b"untouched");
    }

    #[test]
    fn ensure_parent_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("file.txt");
        ensure_parent_dir(&nested).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
    }

    #[test]
    fn remove_existing_removes_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("target");
        fs::write(&file, "content").unwrap();
        remove_existing(&file).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn remove_existing_noop_when_path_absent() {
        let dir = tempfile::tempdir().unwrap();
        remove_existing(&dir.path().join("nonexistent")).unwrap();
    }

    #[test]
    fn remove_existing_refuses_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        assert!(matches!(
            remove_existing(&sub),
            Err(ActionError::Io { .. })
        ));
        assert!(sub.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn remove_existing_removes_broken_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink("/nonexistent/target", &link).unwrap();
        remove_existing(&link).unwrap();
        assert!(link.symlink_metadata().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn real_dir_excludes_symlinked_dir() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        let link = dir.path().join("link");
        fs::create_dir(&real).unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();
        assert!(is_real_dir(&real));
        assert!(!is_real_dir(&link));
        assert!(is_symlink(&link));
    }
}
