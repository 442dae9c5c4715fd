//! External ONNX conversion.
//!
//! The numerical conversion from ONNX to the native symbol/params pair is
//! delegated to an external program. This module only enforces its
//! contract: the program is invoked with the model directory, the ONNX file,
//! and the two output names, and both outputs must exist once it exits
//! successfully.
//!
//! The program is invoked as:
//!
//! ```text
//! <program> --model-path <dir> --onnx-file <file> \
//!           --symbol-file <name>-symbol.json --params-file <name>-0000.params
//! ```

use super::error::{ArchiveError, Result};
use super::exclusion::{ConvertedFiles, ModelConverter};
use super::model_name::ModelName;
use camino::Utf8Path;
use log::{debug, info};
use serde::Deserialize;
use std::io;
use std::path::Path;
use std::process::{Command, Output};

/// Suffix of ONNX model files.
pub const ONNX_SUFFIX: &str = ".onnx";

/// Conversion program used when none is configured.
pub const DEFAULT_ONNX_PROGRAM: &str = "onnx-mxnet-convert";

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the
    /// command.
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        Command::new(cmd).args(args).output()
    }
}

/// Converter settings loaded from the `[converter]` config table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Program that converts ONNX models.
    pub onnx_program: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            onnx_program: DEFAULT_ONNX_PROGRAM.to_owned(),
        }
    }
}

/// A [`ModelConverter`] that shells out to a conversion program.
pub struct CommandConverter {
    suffix: &'static str,
    program: String,
    executor: Box<dyn CommandExecutor>,
}

impl std::fmt::Debug for CommandConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandConverter")
            .field("suffix", &self.suffix)
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

impl CommandConverter {
    /// Create a converter for `suffix` files run by `program`.
    #[must_use]
    pub fn new(
        suffix: &'static str,
        program: impl Into<String>,
        executor: Box<dyn CommandExecutor>,
    ) -> Self {
        Self {
            suffix,
            program: program.into(),
            executor,
        }
    }

    /// Create the ONNX converter described by `config`.
    #[must_use]
    pub fn onnx(config: &ConverterConfig) -> Self {
        Self::new(
            ONNX_SUFFIX,
            config.onnx_program.clone(),
            Box::new(SystemCommandExecutor),
        )
    }

    fn run_program(&self, model_file: &str, args: &[&str]) -> Result<()> {
        let output = match self.executor.run(&self.program, args) {
            Ok(output) => output,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ArchiveError::ConversionDependencyMissing {
                    tool: self.program.clone(),
                    hint: format!(
                        "install {} or configure converter.onnx_program to point at an \
                         ONNX conversion program",
                        self.program
                    ),
                });
            }
            Err(err) => return Err(err.into()),
        };

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(ArchiveError::ConversionFailed {
            file: model_file.to_owned(),
            reason: format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
        })
    }
}

/// Return the output names for converting a model called `model_name`.
///
/// # Examples
///
/// ```
/// use model_archiver::archive::converter::converted_file_names;
/// use model_archiver::archive::model_name::ModelName;
///
/// let name = ModelName::try_from("squeezenet").expect("valid model name");
/// let files = converted_file_names(&name);
/// assert_eq!(files.symbol_file, "squeezenet-symbol.json");
/// assert_eq!(files.params_file, "squeezenet-0000.params");
/// ```
#[must_use]
pub fn converted_file_names(model_name: &ModelName) -> ConvertedFiles {
    ConvertedFiles {
        symbol_file: format!("{model_name}-symbol.json"),
        params_file: format!("{model_name}-0000.params"),
    }
}

impl ModelConverter for CommandConverter {
    fn suffix(&self) -> &'static str {
        self.suffix
    }

    fn convert(
        &self,
        model_dir: &Path,
        model_file: &str,
        model_name: &ModelName,
    ) -> Result<ConvertedFiles> {
        let dir = Utf8Path::from_path(model_dir).ok_or_else(|| ArchiveError::NonUtf8Path {
            path: model_dir.to_path_buf(),
        })?;
        let outputs = converted_file_names(model_name);

        info!("Converting {model_file} with {}", self.program);
        self.run_program(
            model_file,
            &[
                "--model-path",
                dir.as_str(),
                "--onnx-file",
                model_file,
                "--symbol-file",
                &outputs.symbol_file,
                "--params-file",
                &outputs.params_file,
            ],
        )?;

        for produced in [&outputs.symbol_file, &outputs.params_file] {
            if !dir.join(produced).is_file() {
                return Err(ArchiveError::ConversionFailed {
                    file: model_file.to_owned(),
                    reason: format!("{} did not produce {produced}", self.program),
                });
            }
        }
        debug!(
            "{model_file} converted to {} and {}",
            outputs.symbol_file, outputs.params_file
        );
        Ok(outputs)
    }
}
