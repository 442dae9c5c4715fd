//! CLI argument definitions for the model archiver.
//!
//! The command line takes precedence over `config.toml`; [`Cli::settings`]
//! merges both into the parameters the packaging pipeline consumes.

use crate::archive::converter::ConverterConfig;
use crate::archive::created_on::{CreatedOn, is_iso8601_utc};
use crate::archive::error::ArchiveError;
use crate::archive::format::ArchiveFormat;
use crate::archive::manifest::{Publisher, Runtime};
use crate::archive::model_name::ModelName;
use crate::archive::packaging::{ManifestInputs, PackageParams};
use crate::config::{ArchiverConfig, ConfigError};
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::SystemTimeError;
use thiserror::Error;

/// Package model artifacts into a model archive.
#[derive(Parser, Debug)]
#[command(name = "model-archiver")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Package a model directory into ./squeezenet.mar:\n",
    "    $ model-archiver --model-name squeezenet --model-path ./squeezenet \\\n",
    "        --handler handler:handle\n\n",
    "  Write a gzip-compressed tarball, replacing any previous one:\n",
    "    $ model-archiver --model-name squeezenet --model-path ./squeezenet \\\n",
    "        --handler handler:handle --archive-format tgz --export-path dist -f",
))]
pub struct Cli {
    /// Archive identifier; also names the output file.
    #[arg(long, value_name = "NAME")]
    pub model_name: String,

    /// Directory holding the model artifacts.
    #[arg(long, value_name = "DIR")]
    pub model_path: PathBuf,

    /// Handler entry point recorded in the manifest.
    #[arg(long, value_name = "HANDLER")]
    pub handler: String,

    /// Runtime the handler expects [default: python].
    #[arg(long, value_enum)]
    pub runtime: Option<Runtime>,

    /// Serialization engine recorded in the manifest.
    #[arg(long, value_name = "NAME")]
    pub engine: Option<String>,

    /// Publisher name; requires --email.
    #[arg(long, value_name = "NAME", requires = "email")]
    pub author: Option<String>,

    /// Publisher email; requires --author.
    #[arg(long, value_name = "EMAIL", requires = "author")]
    pub email: Option<String>,

    /// Directory that receives the archive [default: current directory].
    #[arg(long, value_name = "DIR")]
    pub export_path: Option<PathBuf>,

    /// Container format [default: default].
    #[arg(long, value_enum)]
    pub archive_format: Option<ArchiveFormat>,

    /// Overwrite an existing archive with the same name.
    #[arg(short, long)]
    pub force: bool,

    /// Configuration file [default: platform config directory].
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Program used to convert ONNX models.
    #[arg(long, value_name = "PROGRAM")]
    pub converter: Option<String>,

    /// Creation timestamp in ISO 8601 UTC form [default: now].
    #[arg(long, value_name = "TIMESTAMP")]
    pub created_on: Option<String>,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(short, long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

/// Errors raised by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    /// Packaging failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `--created-on` is not an ISO 8601 UTC timestamp.
    #[error("invalid --created-on value \"{0}\"; expected YYYY-MM-DDTHH:MM:SSZ")]
    InvalidTimestamp(String),

    /// The system clock is before the Unix epoch.
    #[error("system clock error: {0}")]
    Clock(#[from] SystemTimeError),
}

/// Fully merged settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Pipeline parameters.
    pub params: PackageParams,
    /// Converter settings.
    pub converter: ConverterConfig,
}

impl Cli {
    /// Return the log level selected by `-v`.
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Merge the command line over `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Archive`] for an invalid model name,
    /// [`CliError::InvalidTimestamp`] for a malformed `--created-on`, and
    /// [`CliError::Clock`] if the current time cannot be read.
    pub fn settings(&self, config: ArchiverConfig) -> Result<Settings, CliError> {
        let model_name = ModelName::try_from(self.model_name.as_str())?;
        let created_on = match &self.created_on {
            Some(value) if is_iso8601_utc(value) => CreatedOn::new(value.clone()),
            Some(value) => return Err(CliError::InvalidTimestamp(value.clone())),
            None => CreatedOn::now()?,
        };

        let publisher = match (&self.author, &self.email) {
            (Some(author), Some(email)) => Some(Publisher {
                author: author.clone(),
                email: email.clone(),
            }),
            _ => config.publisher.map(Publisher::from),
        };

        let mut converter = config.converter;
        if let Some(program) = &self.converter {
            converter.onnx_program.clone_from(program);
        }

        let params = PackageParams {
            model_name,
            model_path: self.model_path.clone(),
            export_path: self
                .export_path
                .clone()
                .or(config.export_path)
                .unwrap_or_else(|| PathBuf::from(".")),
            overwrite: self.force,
            format: self
                .archive_format
                .or(config.archive_format)
                .unwrap_or_default(),
            manifest: ManifestInputs {
                handler: self.handler.clone(),
                runtime: self.runtime.or(config.runtime).unwrap_or_default(),
                engine: self.engine.clone(),
                publisher,
                created_on,
            },
        };
        Ok(Settings { params, converter })
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
