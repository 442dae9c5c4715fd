//! Model archive naming, manifest schema, conversion, and packaging.
//!
//! A model directory is packaged into a single archive that carries the
//! model's files plus a generated `MAR-INF/MANIFEST.json`. Two container
//! formats are supported: a flat zip with the `.mar` extension and a
//! gzip-compressed tar rooted at the model name.
//!
//! # Sub-modules
//!
//! - [`cleanup`] - Best-effort removal of temporary conversion outputs.
//! - [`converter`] - External ONNX conversion program.
//! - [`created_on`] - Manifest creation timestamp (`CreatedOn`).
//! - [`error`] - Error types for packaging operations.
//! - [`exclusion`] - Special-format detection and the exclusion plan.
//! - [`filter`] - Directory and file filtering rules.
//! - [`format`] - Archive formats, extensions, and entry naming.
//! - [`manifest`] - Manifest schema types (`Manifest`, `ManifestBuilder`).
//! - [`model_name`] - Model name newtype (`ModelName`).
//! - [`packaging`] - The end-to-end packaging pipeline.
//! - [`paths`] - Directory validation and collision checks.
//! - [`writer`] - Zip and tar.gz archive writers.

pub mod cleanup;
pub mod converter;
pub mod created_on;
pub mod error;
pub mod exclusion;
pub mod filter;
pub mod format;
pub mod manifest;
pub mod model_name;
pub mod packaging;
pub mod paths;
pub mod writer;
