//! Error types for the archive assembly pipeline.
//!
//! Each variant names the offending input so the CLI can report the failure
//! verbatim. Validation variants are raised before any archive file is
//! created; [`ArchiveError::Io`] may leave a partial archive behind.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The role a directory plays in a packaging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRole {
    /// The model directory whose contents are packaged.
    Source,
    /// The directory that receives the finished archive.
    Export,
}

impl fmt::Display for DirectoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "model-path"),
            Self::Export => write!(f, "export-path"),
        }
    }
}

/// Errors arising while validating, converting, or archiving a model.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive identifier does not match the naming policy.
    #[error(
        "model name \"{name}\" contains special characters; \
         the allowed pattern is ^[A-Za-z0-9][A-Za-z0-9_\\-.]*$"
    )]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// A source or export path is not an existing directory.
    #[error("given {role} {} is not a valid directory", path.display())]
    InvalidPath {
        /// Which directory failed validation.
        role: DirectoryRole,
        /// The path as resolved for the check.
        path: PathBuf,
    },

    /// An archive already exists at the target path and overwrite was not
    /// requested.
    #[error(
        "{} already exists; pass --force/-f to overwrite the model archive output file",
        path.display()
    )]
    ArchiveExists {
        /// The colliding archive path.
        path: PathBuf,
    },

    /// More than one file carries a special-format suffix.
    #[error(
        "model-archiver expects only one {suffix} file in the folder; \
         found {count} files {files:?} in model-path"
    )]
    MultipleCandidateFiles {
        /// The suffix that matched ambiguously.
        suffix: String,
        /// Number of matching files.
        count: usize,
        /// The matching file names, sorted.
        files: Vec<String>,
    },

    /// The external conversion program could not be started.
    #[error("conversion tool {tool} is not installed: {hint}")]
    ConversionDependencyMissing {
        /// The program that was looked up.
        tool: String,
        /// How to install it.
        hint: String,
    },

    /// The conversion program ran but did not produce usable output.
    #[error("failed to convert {file}: {reason}")]
    ConversionFailed {
        /// The source model file being converted.
        file: String,
        /// Description of the failure.
        reason: String,
    },

    /// A file path inside the model directory is not valid UTF-8.
    #[error("archive entry path is not valid UTF-8: {}", path.display())]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// JSON serialization of the manifest failed.
    #[error("manifest serialization error: {0}")]
    ManifestSerialization(#[from] serde_json::Error),

    /// An I/O operation failed while reading sources or writing the archive.
    #[error("I/O error during archiving: {0}")]
    Io(#[from] std::io::Error),
}

impl From<walkdir::Error> for ArchiveError {
    fn from(err: walkdir::Error) -> Self {
        Self::Io(err.into())
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Io(err.into())
    }
}

/// Result type alias using [`ArchiveError`].
pub type Result<T> = std::result::Result<T, ArchiveError>;
