//! Model archiver library.
//!
//! This crate packages a directory of model artifacts, together with a
//! generated manifest, into a single distributable archive. It is used by the
//! `model-archiver` CLI binary and can be driven programmatically through
//! [`archive::packaging::package_model`].
//!
//! # Modules
//!
//! - [`archive`] - Naming, manifest schema, conversion, and archive writing
//! - [`cli`] - Command-line argument definitions and config merging
//! - [`config`] - `config.toml` loading

pub mod archive;
pub mod cli;
pub mod config;
