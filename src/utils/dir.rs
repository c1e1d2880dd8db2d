//! Directory primitives used when preparing and populating a target directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::Result;
use crate::utils::io::io_error;

/// Entry preserved by [`is_empty_dir`] and [`clean_dir`].
pub const GIT_DIR: &str = ".git";

/// True when `path` has no entries, or only a `.git` entry.
///
/// `path` must exist and be a directory.
pub fn is_empty_dir(path: &Path) -> Result<bool> {
    let mut names = Vec::new();
    for entry in fs::read_dir(path).map_err(|e| io_error(e, "read directory", path))? {
        let entry = entry.map_err(|e| io_error(e, "read directory", path))?;
        names.push(entry.file_name());
        if names.len() > 1 {
            return Ok(false);
        }
    }

    Ok(match names.as_slice() {
        [] => true,
        [only] => only == GIT_DIR,
        _ => false,
    })
}

/// Remove everything directly under `path` except `.git`.
///
/// A missing `path`, or entries that disappear while clearing, are not errors.
pub fn clean_dir(path: &Path) -> Result<()> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(io_error(e, "read directory", path)),
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(io_error(e, "read directory", path)),
        };

        if entry.file_name() == GIT_DIR {
            continue;
        }

        let entry_path = entry.path();
        let removed = match entry.file_type() {
            Ok(kind) if kind.is_dir() => fs::remove_dir_all(&entry_path),
            Ok(_) => fs::remove_file(&entry_path),
            Err(e) => Err(e),
        };

        match removed {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(io_error(e, "remove", &entry_path)),
        }
    }

    Ok(())
}

/// Recursively copy `src` to `dest`.
///
/// A directory source creates `dest` and copies entry by entry; a file source
/// is copied byte for byte, creating parent directories as needed. Symbolic
/// links are recreated as links and never followed.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(src).map_err(|e| io_error(e, "stat", src))?;

    if metadata.file_type().is_symlink() {
        let target = fs::read_link(src).map_err(|e| io_error(e, "read link", src))?;
        create_symlink(&target, dest)
    } else if metadata.is_dir() {
        fs::create_dir_all(dest).map_err(|e| io_error(e, "create directory", dest))?;
        for entry in fs::read_dir(src).map_err(|e| io_error(e, "read directory", src))? {
            let entry = entry.map_err(|e| io_error(e, "read directory", src))?;
            copy_tree(&entry.path(), &dest.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        create_parent(dest)?;
        fs::copy(src, dest).map_err(|e| io_error(e, "copy", src))?;
        Ok(())
    }
}

/// Create `dest` as a symbolic link to `target`. The target is stored as
/// given and does not have to exist.
#[cfg(unix)]
pub fn create_symlink(target: &Path, dest: &Path) -> Result<()> {
    create_parent(dest)?;
    std::os::unix::fs::symlink(target, dest).map_err(|e| io_error(e, "create symlink", dest))
}

#[cfg(not(unix))]
pub fn create_symlink(target: &Path, dest: &Path) -> Result<()> {
    log_status!("copy", "Skipping symlink {} -> {}", dest.display(), target.display());
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(e, "create directory", parent))?;
    }
    Ok(())
}

/// Make `path` absolute against `base` and fold `.` and `..` lexically.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// True when `a` and `b` name the same location once made absolute.
pub fn are_directories_equal(a: &Path, b: &Path) -> bool {
    match std::env::current_dir() {
        Ok(cwd) => absolutize(&cwd, a) == absolutize(&cwd, b),
        Err(_) => a == b,
    }
}
