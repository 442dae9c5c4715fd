//! User configuration loaded from `config.toml`.
//!
//! Settings are optional and act as defaults beneath the command line. The
//! file lives at `<config dir>/model-archiver/config.toml` unless a path is
//! given explicitly:
//!
//! ```toml
//! export_path = "/srv/models"
//! runtime = "python3"
//! archive_format = "tgz"
//!
//! [publisher]
//! author = "Jane Doe"
//! email = "jane@example.com"
//!
//! [converter]
//! onnx_program = "/opt/bin/onnx-mxnet-convert"
//! ```

use crate::archive::converter::ConverterConfig;
use crate::archive::format::ArchiveFormat;
use crate::archive::manifest::{Publisher, Runtime};
use directories_next::ProjectDirs;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        /// The file that was being parsed.
        path: PathBuf,
        /// The parser error.
        #[source]
        source: toml::de::Error,
    },
}

/// Publisher defaults from the `[publisher]` table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PublisherConfig {
    /// Author name.
    pub author: String,
    /// Contact email.
    pub email: String,
}

impl From<PublisherConfig> for Publisher {
    fn from(config: PublisherConfig) -> Self {
        Self {
            author: config.author,
            email: config.email,
        }
    }
}

/// Settings read from `config.toml`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiverConfig {
    /// Directory that receives archives when `--export-path` is absent.
    pub export_path: Option<PathBuf>,
    /// Runtime recorded when `--runtime` is absent.
    pub runtime: Option<Runtime>,
    /// Container format used when `--archive-format` is absent.
    pub archive_format: Option<ArchiveFormat>,
    /// Publisher recorded when `--author` and `--email` are absent.
    pub publisher: Option<PublisherConfig>,
    /// External conversion tooling.
    pub converter: ConverterConfig,
}

impl ArchiverConfig {
    /// Load configuration from `explicit`, or from the default location.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if a file that should exist cannot be
    /// read and [`ConfigError::Parse`] if it is malformed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Self::load_default(default_config_path()),
        }
    }

    /// Load configuration from `path` if it exists, otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be loaded.
    pub fn load_default(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.is_file() => Self::from_file(&path),
            Some(path) => {
                debug!("no config file at {}; using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }
}

/// Return the platform-specific default config file path.
///
/// Returns `None` when no home directory can be determined.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "model-archiver")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
