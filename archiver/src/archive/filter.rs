//! Entry filtering policy for model directory traversal.
//!
//! Directories named in [`UNWANTED_DIRS`] or starting with `.` are pruned
//! together with their contents. Files are dropped when their name is in the
//! exclusion set, equals the reserved manifest name, or ends with one of
//! [`UNWANTED_SUFFIXES`]. Name checks apply at every depth.

use super::format::MANIFEST_FILE_NAME;
use std::collections::BTreeSet;

/// Directory names that are never packaged.
pub const UNWANTED_DIRS: [&str; 2] = ["__MACOSX", "__pycache__"];

/// File name suffixes that are never packaged.
pub const UNWANTED_SUFFIXES: [&str; 3] = [".pyc", ".DS_Store", ".mar"];

/// Decides which directories and files enter an archive.
///
/// # Examples
///
/// ```
/// use model_archiver::archive::filter::EntryFilter;
/// use std::collections::BTreeSet;
///
/// let excluded = BTreeSet::from(["model.onnx".to_owned()]);
/// let filter = EntryFilter::new(&excluded);
///
/// assert!(filter.accepts_file("handler.py"));
/// assert!(!filter.accepts_file("model.onnx"));
/// assert!(!filter.accepts_file("MANIFEST.json"));
/// assert!(!filter.accepts_dir("__pycache__"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EntryFilter<'a> {
    excluded: &'a BTreeSet<String>,
}

impl<'a> EntryFilter<'a> {
    /// Create a filter that additionally rejects every name in `excluded`.
    #[must_use]
    pub const fn new(excluded: &'a BTreeSet<String>) -> Self {
        Self { excluded }
    }

    /// Return `true` if a directory with this name should be descended.
    #[must_use]
    pub fn accepts_dir(&self, name: &str) -> bool {
        !UNWANTED_DIRS.contains(&name) && !name.starts_with('.')
    }

    /// Return `true` if a file with this name should be packaged.
    #[must_use]
    pub fn accepts_file(&self, name: &str) -> bool {
        if name == MANIFEST_FILE_NAME || self.excluded.contains(name) {
            return false;
        }
        !UNWANTED_SUFFIXES
            .iter()
            .any(|suffix| name.ends_with(suffix))
    }
}
