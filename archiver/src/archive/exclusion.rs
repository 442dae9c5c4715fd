//! Special-format detection and the exclusion plan.
//!
//! Some model formats must be converted before packaging. Each registered
//! [`ModelConverter`] claims a file suffix; when exactly one file in the
//! model directory carries that suffix, the converter writes replacement
//! files next to it and the original is excluded from the archive. The
//! replacement files are temporary and removed once the archive is written.

use super::cleanup::remove_all;
use super::converter::{CommandConverter, ConverterConfig};
use super::error::{ArchiveError, Result};
use super::model_name::ModelName;
use log::debug;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Files written by a converter into the model directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFiles {
    /// File name of the generated topology descriptor.
    pub symbol_file: String,
    /// File name of the generated parameter blob.
    pub params_file: String,
}

/// A detector/converter pair for one special model format.
#[cfg_attr(test, mockall::automock)]
pub trait ModelConverter {
    /// File name suffix this converter handles, including the leading dot.
    fn suffix(&self) -> &'static str;

    /// Convert `model_file` inside `model_dir` into files named after
    /// `model_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::ConversionDependencyMissing`] if the
    /// conversion tooling is unavailable and
    /// [`ArchiveError::ConversionFailed`] if the input cannot be converted.
    fn convert(
        &self,
        model_dir: &Path,
        model_file: &str,
        model_name: &ModelName,
    ) -> Result<ConvertedFiles>;
}

/// Files to add and originals to omit for one packaging run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionPlan {
    /// Absolute paths of generated files, in generation order.
    pub temporary_files: Vec<PathBuf>,
    /// Names of original files that must not be packaged.
    pub excluded_originals: BTreeSet<String>,
}

impl ExclusionPlan {
    /// Return `true` if no conversion took place.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temporary_files.is_empty() && self.excluded_originals.is_empty()
    }
}

/// Runs every registered converter over a model directory.
pub struct ExclusionResolver {
    converters: Vec<Box<dyn ModelConverter>>,
}

impl std::fmt::Debug for ExclusionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suffixes: Vec<&str> = self.converters.iter().map(|c| c.suffix()).collect();
        f.debug_struct("ExclusionResolver")
            .field("suffixes", &suffixes)
            .finish()
    }
}

impl ExclusionResolver {
    /// Create a resolver over an explicit converter registry.
    #[must_use]
    pub fn new(converters: Vec<Box<dyn ModelConverter>>) -> Self {
        Self { converters }
    }

    /// Create a resolver with the built-in ONNX converter.
    #[must_use]
    pub fn with_defaults(config: &ConverterConfig) -> Self {
        Self::new(vec![Box::new(CommandConverter::onnx(config))])
    }

    /// Inspect `model_dir` and convert any special-format model file.
    ///
    /// Every converter's suffix is matched before any conversion runs, so an
    /// ambiguous directory fails without touching its contents. If a
    /// conversion fails, files generated by earlier conversions are removed
    /// before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::MultipleCandidateFiles`] if a suffix matches
    /// more than one file, any error raised by a converter, or
    /// [`ArchiveError::Io`] if the directory cannot be listed.
    pub fn resolve(&self, model_dir: &Path, model_name: &ModelName) -> Result<ExclusionPlan> {
        let files = list_files(model_dir)?;

        let mut matches = Vec::new();
        for converter in &self.converters {
            if let Some(file) = find_unique(&files, converter.suffix())? {
                debug!("found {} model file {file}", converter.suffix());
                matches.push((converter, file));
            }
        }

        let mut plan = ExclusionPlan::default();
        for (converter, file) in matches {
            let converted = match converter.convert(model_dir, &file, model_name) {
                Ok(converted) => converted,
                Err(err) => {
                    // Outputs of earlier conversions never reach the caller.
                    remove_all(&plan.temporary_files);
                    return Err(err);
                }
            };
            plan.temporary_files
                .push(model_dir.join(&converted.symbol_file));
            plan.temporary_files
                .push(model_dir.join(&converted.params_file));
            plan.excluded_originals.insert(file);
        }
        Ok(plan)
    }
}

/// Return the single file in `files` ending with `suffix`, if any.
///
/// # Errors
///
/// Returns [`ArchiveError::MultipleCandidateFiles`] when more than one file
/// matches.
///
/// # Examples
///
/// ```
/// use model_archiver::archive::exclusion::find_unique;
/// use std::collections::BTreeSet;
///
/// let files = BTreeSet::from(["model.onnx".to_owned(), "signature.json".to_owned()]);
/// assert_eq!(find_unique(&files, ".onnx").expect("unique"), Some("model.onnx".to_owned()));
/// assert_eq!(find_unique(&files, ".params").expect("none"), None);
/// ```
pub fn find_unique(files: &BTreeSet<String>, suffix: &str) -> Result<Option<String>> {
    let matched: Vec<String> = files
        .iter()
        .filter(|name| name.ends_with(suffix))
        .cloned()
        .collect();
    match matched.len() {
        0 => Ok(None),
        1 => Ok(matched.into_iter().next()),
        count => Err(ArchiveError::MultipleCandidateFiles {
            suffix: suffix.to_owned(),
            count,
            files: matched,
        }),
    }
}

/// List the names of regular files directly inside `dir`.
fn list_files(dir: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.insert(name);
        }
    }
    Ok(names)
}

#[cfg(test)]
#[path = "exclusion_tests.rs"]
mod tests;
