//! Archive writing for both container formats.
//!
//! The model directory is walked once in file-name order; accepted files are
//! streamed into an [`ArchiveSink`] chosen by [`ArchiveFormat`], and the
//! manifest is appended last from memory. A write failure aborts the run and
//! may leave a partial archive at the target path.

use super::error::{ArchiveError, Result};
use super::exclusion::ExclusionPlan;
use super::filter::EntryFilter;
use super::format::{ArchiveFormat, archive_path};
use super::model_name::ModelName;
use camino::Utf8Path;
use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};
use log::{debug, info};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Destination for archive entries.
pub trait ArchiveSink {
    /// Copy the file at `path` into the archive as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Io`] if the file cannot be read or the entry
    /// cannot be written.
    fn append_file(&mut self, name: &str, path: &Path) -> Result<()>;

    /// Write `data` into the archive as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Io`] if the entry cannot be written.
    fn append_bytes(&mut self, name: &str, data: &[u8]) -> Result<()>;

    /// Write trailing metadata and flush the archive.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Io`] if finalization fails.
    fn finish(self: Box<Self>) -> Result<()>;
}

/// Zip container with per-entry deflate compression.
struct ZipSink {
    writer: ZipWriter<File>,
}

impl ZipSink {
    fn options(size: u64) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
            .large_file(size >= u64::from(u32::MAX))
    }
}

impl ArchiveSink for ZipSink {
    fn append_file(&mut self, name: &str, path: &Path) -> Result<()> {
        let mut source = File::open(path)?;
        let size = source.metadata()?.len();
        self.writer.start_file(name, Self::options(size))?;
        io::copy(&mut source, &mut self.writer)?;
        Ok(())
    }

    fn append_bytes(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.writer
            .start_file(name, Self::options(data.len() as u64))?;
        io::Write::write_all(&mut self.writer, data)?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<()> {
        self.writer.finish()?;
        Ok(())
    }
}

/// Tar stream wrapped in whole-stream gzip compression.
struct TarGzSink {
    builder: tar::Builder<GzEncoder<File>>,
}

impl TarGzSink {
    fn new(file: File) -> Self {
        let encoder = GzBuilder::new()
            .mtime(0)
            .write(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        builder.mode(tar::HeaderMode::Deterministic);
        Self { builder }
    }
}

impl ArchiveSink for TarGzSink {
    fn append_file(&mut self, name: &str, path: &Path) -> Result<()> {
        self.builder.append_path_with_name(path, name)?;
        Ok(())
    }

    fn append_bytes(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(0);
        header.set_entry_type(tar::EntryType::Regular);
        self.builder.append_data(&mut header, name, data)?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<()> {
        let encoder = self.builder.into_inner()?;
        encoder.finish()?;
        Ok(())
    }
}

/// Create (or truncate) the archive at `path` and return its sink.
///
/// # Errors
///
/// Returns [`ArchiveError::Io`] if the file cannot be created.
pub fn open_sink(path: &Path, format: ArchiveFormat) -> Result<Box<dyn ArchiveSink>> {
    let file = File::create(path)?;
    Ok(match format {
        ArchiveFormat::Default => Box::new(ZipSink {
            writer: ZipWriter::new(file),
        }),
        ArchiveFormat::Tgz => Box::new(TarGzSink::new(file)),
    })
}

/// Inputs for a single archive write.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveJob<'a> {
    /// The model directory to package.
    pub source_dir: &'a Path,
    /// The directory receiving the archive.
    pub export_dir: &'a Path,
    /// The archive identifier.
    pub name: &'a ModelName,
    /// Originals to omit.
    pub plan: &'a ExclusionPlan,
    /// The serialized manifest.
    pub manifest_json: &'a str,
    /// The container format.
    pub format: ArchiveFormat,
}

/// Write the archive described by `job` and return its path.
///
/// # Errors
///
/// Returns [`ArchiveError::Io`] on any read or write failure and
/// [`ArchiveError::NonUtf8Path`] if a packaged path is not valid UTF-8.
pub fn write_archive(job: &ArchiveJob<'_>) -> Result<PathBuf> {
    let path = archive_path(job.export_dir, job.name, job.format);
    let filter = EntryFilter::new(&job.plan.excluded_originals);
    let mut sink = open_sink(&path, job.format)?;
    // The export directory may sit inside the model directory under another
    // spelling, so the archive is recognised by its canonical path.
    let own_archive = fs::canonicalize(&path)?;

    let mut count = 0_usize;
    for entry in walk(job.source_dir, filter) {
        let entry = entry?;
        if !entry.file_type().is_file() || !filter.accepts_file(&file_name(&entry)) {
            continue;
        }
        if is_same_file(&entry, &own_archive) {
            debug!("skipping the archive being written");
            continue;
        }
        let relative = relative_entry_name(job.source_dir, entry.path())?;
        let name = job.format.entry_name(job.name, &relative);
        debug!("adding {name}");
        sink.append_file(&name, entry.path())?;
        count += 1;
    }

    sink.append_bytes(&job.format.manifest_entry(job.name), job.manifest_json.as_bytes())?;
    sink.finish()?;
    info!(
        "Wrote {count} files and the manifest to {}",
        path.display()
    );
    Ok(path)
}

/// Walk `root` in file-name order, pruning rejected directories.
fn walk<'a>(
    root: &'a Path,
    filter: EntryFilter<'a>,
) -> impl Iterator<Item = walkdir::Result<DirEntry>> + 'a {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || filter.accepts_dir(&file_name(entry))
        })
}

/// Return `true` if `entry` resolves to `canonical`.
fn is_same_file(entry: &DirEntry, canonical: &Path) -> bool {
    if canonical.file_name() != Some(entry.file_name()) && !entry.path_is_symlink() {
        return false;
    }
    fs::canonicalize(entry.path()).is_ok_and(|resolved| resolved == canonical)
}

fn file_name(entry: &DirEntry) -> String {
    entry.file_name().to_string_lossy().into_owned()
}

/// Return `path` relative to `root` with `/` separators.
fn relative_entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(io::Error::other)?;
    let utf8 = Utf8Path::from_path(relative).ok_or_else(|| ArchiveError::NonUtf8Path {
        path: path.to_path_buf(),
    })?;
    Ok(utf8
        .components()
        .map(|component| component.as_str())
        .collect::<Vec<_>>()
        .join("/"))
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
