//! Removal of temporary conversion outputs.
//!
//! Cleanup is best-effort: a path that cannot be removed is logged and
//! recorded, and the remaining paths are still attempted. A missing temp file
//! therefore never masks a successfully written archive.

use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Outcome of a cleanup pass.
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Paths that were deleted.
    pub removed: Vec<PathBuf>,
    /// Paths that could not be deleted, with the reason.
    pub failed: Vec<(PathBuf, io::Error)>,
}

impl CleanupReport {
    /// Return `true` if every path was removed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Delete every path in `paths`, continuing past failures.
///
/// # Examples
///
/// ```
/// use model_archiver::archive::cleanup::remove_all;
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// let temp = dir.path().join("model-symbol.json");
/// std::fs::write(&temp, b"{}").expect("write");
///
/// let report = remove_all(&[temp.clone(), dir.path().join("missing.params")]);
/// assert!(!temp.exists());
/// assert_eq!(report.removed.len(), 1);
/// assert_eq!(report.failed.len(), 1);
/// ```
pub fn remove_all<P: AsRef<Path>>(paths: &[P]) -> CleanupReport {
    let mut report = CleanupReport::default();
    for path in paths {
        let path = path.as_ref();
        match fs::remove_file(path) {
            Ok(()) => {
                debug!("removed temporary file {}", path.display());
                report.removed.push(path.to_path_buf());
            }
            Err(err) => {
                warn!("failed to remove temporary file {}: {err}", path.display());
                report.failed.push((path.to_path_buf(), err));
            }
        }
    }
    report
}
