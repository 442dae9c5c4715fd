//! Model archive packaging pipeline.
//!
//! Runs the stages in a fixed order: directory validation, collision check,
//! special-format conversion, manifest generation, archive writing, and
//! cleanup of conversion outputs. Validation failures surface before the
//! archive file is created. Cleanup runs whether or not the write succeeds.

use super::cleanup::{CleanupReport, remove_all};
use super::created_on::CreatedOn;
use super::error::{DirectoryRole, Result};
use super::exclusion::ExclusionResolver;
use super::format::ArchiveFormat;
use super::manifest::{Manifest, ManifestBuilder, Publisher, Runtime};
use super::model_name::ModelName;
use super::paths::{resolve_output, validate_directory};
use super::writer::{ArchiveJob, write_archive};
use log::{info, warn};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// User-supplied metadata recorded in the manifest.
#[derive(Debug, Clone)]
pub struct ManifestInputs {
    /// Entry point of the model's handler code.
    pub handler: String,
    /// Runtime the handler expects.
    pub runtime: Runtime,
    /// Serialization engine, if declared.
    pub engine: Option<String>,
    /// Publisher, if declared.
    pub publisher: Option<Publisher>,
    /// Creation timestamp.
    pub created_on: CreatedOn,
}

/// Input parameters for [`package_model`].
#[derive(Debug, Clone)]
pub struct PackageParams {
    /// The archive identifier.
    pub model_name: ModelName,
    /// Directory holding the model artifacts.
    pub model_path: PathBuf,
    /// Directory where the archive will be written.
    pub export_path: PathBuf,
    /// Replace an existing archive instead of failing.
    pub overwrite: bool,
    /// The container format.
    pub format: ArchiveFormat,
    /// Manifest metadata.
    pub manifest: ManifestInputs,
}

/// Output produced by [`package_model`].
#[derive(Debug)]
pub struct PackageOutput {
    /// Path to the created archive.
    pub archive_path: PathBuf,
    /// The manifest embedded in the archive.
    pub manifest: Manifest,
    /// Lowercase hex SHA-256 digest of the archive.
    pub sha256: String,
    /// Result of removing conversion outputs.
    pub cleanup: CleanupReport,
}

/// Compute the lowercase hex SHA-256 digest of a file.
///
/// # Errors
///
/// Returns [`ArchiveError::Io`] if the file cannot be read.
///
/// [`ArchiveError::Io`]: super::error::ArchiveError::Io
pub fn compute_sha256(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Package a model directory into an archive.
///
/// # Errors
///
/// Returns [`ArchiveError::InvalidPath`] or [`ArchiveError::ArchiveExists`]
/// before anything is written, any error raised by `resolver`, and
/// [`ArchiveError::Io`] if the archive cannot be written. A digest failure
/// after a successful write is also reported as [`ArchiveError::Io`]; the
/// archive stays on disk and the cleanup outcome is logged, not returned.
///
/// [`ArchiveError::InvalidPath`]: super::error::ArchiveError::InvalidPath
/// [`ArchiveError::ArchiveExists`]: super::error::ArchiveError::ArchiveExists
/// [`ArchiveError::Io`]: super::error::ArchiveError::Io
pub fn package_model(params: PackageParams, resolver: &ExclusionResolver) -> Result<PackageOutput> {
    let export_path = validate_directory(&params.export_path, DirectoryRole::Export)?;
    let model_path = validate_directory(&params.model_path, DirectoryRole::Source)?;
    let export_path = resolve_output(
        &export_path,
        &params.model_name,
        params.format,
        params.overwrite,
    )?;

    let plan = resolver.resolve(&model_path, &params.model_name)?;
    if !plan.is_empty() {
        info!(
            "Excluding {:?}; packaging {} converted files",
            plan.excluded_originals,
            plan.temporary_files.len()
        );
    }

    let inputs = params.manifest;
    let manifest = ManifestBuilder::new(
        &params.model_name,
        inputs.handler,
        inputs.runtime,
        inputs.created_on,
    )
    .engine(inputs.engine)
    .publisher(inputs.publisher)
    .build();

    let written = manifest.to_json().and_then(|manifest_json| {
        write_archive(&ArchiveJob {
            source_dir: &model_path,
            export_dir: &export_path,
            name: &params.model_name,
            plan: &plan,
            manifest_json: &manifest_json,
            format: params.format,
        })
    });

    let cleanup = remove_all(&plan.temporary_files);
    if !cleanup.is_clean() {
        warn!("{} temporary files could not be removed", cleanup.failed.len());
    }

    let archive_path = written?;
    let sha256 = digest_written(&archive_path, &cleanup)?;
    info!("Created {}", archive_path.display());
    Ok(PackageOutput {
        archive_path,
        manifest,
        sha256,
        cleanup,
    })
}

/// Digest a freshly written archive, logging what is left behind on failure.
fn digest_written(archive_path: &Path, cleanup: &CleanupReport) -> Result<String> {
    compute_sha256(archive_path).inspect_err(|err| {
        warn!(
            "Archive {} was written but could not be digested: {err}",
            archive_path.display()
        );
        warn!(
            "Cleanup removed {} temporary files; {} remain",
            cleanup.removed.len(),
            cleanup.failed.len()
        );
    })
}

#[cfg(test)]
#[path = "packaging_tests.rs"]
mod tests;
