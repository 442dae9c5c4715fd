//! Directory validation and output collision checks.
//!
//! Both checks run before the archive is opened so that a rejected request
//! never creates or truncates an output file.

use super::error::{ArchiveError, DirectoryRole, Result};
use super::format::{ArchiveFormat, archive_path};
use super::model_name::ModelName;
use log::warn;
use std::path::{Component, Path, PathBuf};

/// Resolve `path` to an absolute path and confirm it is a directory.
///
/// Relative paths are resolved against the current working directory and
/// `.`/`..` components are collapsed lexically, so `missing/../model` names
/// `model` even when `missing` does not exist. Symlinks are not resolved.
///
/// # Errors
///
/// Returns [`ArchiveError::InvalidPath`] if the absolute path does not name
/// an existing directory, or [`ArchiveError::Io`] if the current directory
/// cannot be determined.
///
/// # Examples
///
/// ```
/// use model_archiver::archive::error::DirectoryRole;
/// use model_archiver::archive::paths::validate_directory;
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// let resolved = validate_directory(dir.path(), DirectoryRole::Source).expect("valid");
/// assert!(resolved.is_absolute());
///
/// let missing = dir.path().join("missing");
/// assert!(validate_directory(&missing, DirectoryRole::Export).is_err());
/// ```
pub fn validate_directory(path: &Path, role: DirectoryRole) -> Result<PathBuf> {
    let absolute = normalize_lexically(&std::path::absolute(path)?);
    if absolute.is_dir() {
        Ok(absolute)
    } else {
        Err(ArchiveError::InvalidPath {
            role,
            path: absolute,
        })
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root.
fn normalize_lexically(path: &Path) -> PathBuf {
    path.components().fold(PathBuf::new(), |mut normalized, component| {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if normalized.parent().is_some() {
                    normalized.pop();
                }
            }
            other => normalized.push(other),
        }
        normalized
    })
}

/// Check whether an archive for `name` already exists in `export_dir`.
///
/// When a file exists at the target path, `overwrite` decides the outcome:
/// `true` logs a warning and proceeds, `false` fails. Returns the export
/// directory the archive will be written to. The check and the later write
/// are not atomic.
///
/// # Errors
///
/// Returns [`ArchiveError::ArchiveExists`] if the target exists and
/// `overwrite` is `false`.
pub fn resolve_output(
    export_dir: &Path,
    name: &ModelName,
    format: ArchiveFormat,
    overwrite: bool,
) -> Result<PathBuf> {
    let target = archive_path(export_dir, name, format);
    if target.exists() {
        if !overwrite {
            return Err(ArchiveError::ArchiveExists { path: target });
        }
        warn!("Overwriting {} ...", target.display());
    }
    Ok(export_dir.to_path_buf())
}
