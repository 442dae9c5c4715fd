//! Container formats and their naming conventions.
//!
//! The `default` format is a zip container with the `.mar` extension whose
//! entries are named relative to the model directory. The `tgz` format is a
//! gzip-compressed tar stream whose entries all live under a directory named
//! after the model.

use super::model_name::ModelName;
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Extension of `default` format archives.
pub const MODEL_ARCHIVE_EXTENSION: &str = ".mar";

/// Extension of `tgz` format archives.
pub const TAR_GZ_EXTENSION: &str = ".tar.gz";

/// Directory holding archive metadata.
pub const MAR_INF: &str = "MAR-INF";

/// File name of the embedded manifest.
pub const MANIFEST_FILE_NAME: &str = "MANIFEST.json";

/// The container format of a model archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveFormat {
    /// Zip container with per-entry deflate compression (`.mar`).
    #[default]
    Default,
    /// Gzip-compressed tar stream rooted under the model name (`.tar.gz`).
    Tgz,
}

impl ArchiveFormat {
    /// Return the file extension for archives of this format.
    ///
    /// # Examples
    ///
    /// ```
    /// use model_archiver::archive::format::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::Default.extension(), ".mar");
    /// assert_eq!(ArchiveFormat::Tgz.extension(), ".tar.gz");
    /// ```
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Default => MODEL_ARCHIVE_EXTENSION,
            Self::Tgz => TAR_GZ_EXTENSION,
        }
    }

    /// Return the archive file name for `name`.
    #[must_use]
    pub fn file_name(self, name: &ModelName) -> String {
        format!("{name}{}", self.extension())
    }

    /// Build the entry name for a file at `relative` inside the model
    /// directory. `relative` must already use `/` separators.
    ///
    /// # Examples
    ///
    /// ```
    /// use model_archiver::archive::format::ArchiveFormat;
    /// use model_archiver::archive::model_name::ModelName;
    ///
    /// let name = ModelName::try_from("mymodel").expect("valid model name");
    /// assert_eq!(ArchiveFormat::Default.entry_name(&name, "lib/util.py"), "lib/util.py");
    /// assert_eq!(
    ///     ArchiveFormat::Tgz.entry_name(&name, "lib/util.py"),
    ///     "mymodel/lib/util.py"
    /// );
    /// ```
    #[must_use]
    pub fn entry_name(self, name: &ModelName, relative: &str) -> String {
        match self {
            Self::Default => relative.to_owned(),
            Self::Tgz => format!("{name}/{relative}"),
        }
    }

    /// Return the reserved entry name of the manifest.
    #[must_use]
    pub fn manifest_entry(self, name: &ModelName) -> String {
        self.entry_name(name, &format!("{MAR_INF}/{MANIFEST_FILE_NAME}"))
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Tgz => write!(f, "tgz"),
        }
    }
}

/// Return the deterministic archive path for `name` inside `export_dir`.
///
/// # Examples
///
/// ```
/// use model_archiver::archive::format::{ArchiveFormat, archive_path};
/// use model_archiver::archive::model_name::ModelName;
/// use std::path::Path;
///
/// let name = ModelName::try_from("mymodel").expect("valid model name");
/// assert_eq!(
///     archive_path(Path::new("/srv/models"), &name, ArchiveFormat::Tgz),
///     Path::new("/srv/models/mymodel.tar.gz")
/// );
/// ```
#[must_use]
pub fn archive_path(export_dir: &Path, name: &ModelName, format: ArchiveFormat) -> PathBuf {
    export_dir.join(format.file_name(name))
}
