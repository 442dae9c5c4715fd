//! Manifest schema and builder.
//!
//! Every archive embeds a `MAR-INF/MANIFEST.json` describing the model it
//! carries:
//!
//! ```json
//! {
//!   "createdOn": "2026-10-16T09:30:00Z",
//!   "runtime": "python",
//!   "model": {
//!     "modelName": "squeezenet",
//!     "handler": "handler:handle"
//!   },
//!   "engine": {
//!     "engineName": "MXNet"
//!   },
//!   "publisher": {
//!     "author": "Jane Doe",
//!     "email": "jane@example.com"
//!   },
//!   "archiverVersion": "1.0"
//! }
//! ```
//!
//! `engine` and `publisher` are omitted when not supplied. Field order is
//! fixed by declaration order, so identical inputs serialize to identical
//! bytes.

use super::created_on::CreatedOn;
use super::error::Result;
use super::model_name::ModelName;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Version of the archive layout written into every manifest.
pub const ARCHIVER_VERSION: &str = "1.0";

/// The runtime the model's handler expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    /// The default Python interpreter.
    #[default]
    Python,
    /// Python 2.
    Python2,
    /// Python 3.
    Python3,
}

/// Identity of the packaged model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSection {
    /// The archive identifier.
    pub model_name: String,
    /// Entry point of the model's handler code.
    pub handler: String,
}

/// The serialization engine the model targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSection {
    /// Engine name, for example `MXNet`.
    pub engine_name: String,
}

/// Who published the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    /// Author name.
    pub author: String,
    /// Contact email.
    pub email: String,
}

/// The manifest record embedded in each archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    created_on: CreatedOn,
    runtime: Runtime,
    model: ModelSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    engine: Option<EngineSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    publisher: Option<Publisher>,
    archiver_version: String,
}

impl Manifest {
    /// Return the creation timestamp.
    #[must_use]
    pub fn created_on(&self) -> &CreatedOn {
        &self.created_on
    }

    /// Return the runtime.
    #[must_use]
    pub fn runtime(&self) -> Runtime {
        self.runtime
    }

    /// Return the model section.
    #[must_use]
    pub fn model(&self) -> &ModelSection {
        &self.model
    }

    /// Return the engine section, if any.
    #[must_use]
    pub fn engine(&self) -> Option<&EngineSection> {
        self.engine.as_ref()
    }

    /// Return the publisher section, if any.
    #[must_use]
    pub fn publisher(&self) -> Option<&Publisher> {
        self.publisher.as_ref()
    }

    /// Return the archiver version.
    #[must_use]
    pub fn archiver_version(&self) -> &str {
        &self.archiver_version
    }

    /// Serialize the manifest to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::ManifestSerialization`] if serialization
    /// fails.
    ///
    /// [`ArchiveError::ManifestSerialization`]: super::error::ArchiveError::ManifestSerialization
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Assembles a [`Manifest`] from user-supplied metadata.
///
/// # Examples
///
/// ```
/// use model_archiver::archive::created_on::CreatedOn;
/// use model_archiver::archive::manifest::{ManifestBuilder, Runtime};
/// use model_archiver::archive::model_name::ModelName;
///
/// let name = ModelName::try_from("squeezenet").expect("valid model name");
/// let manifest = ManifestBuilder::new(
///     &name,
///     "handler:handle",
///     Runtime::Python3,
///     CreatedOn::new("2026-10-16T09:30:00Z"),
/// )
/// .engine(Some("MXNet".to_owned()))
/// .build();
///
/// assert_eq!(manifest.model().model_name, "squeezenet");
/// assert!(manifest.publisher().is_none());
/// let json = manifest.to_json().expect("serializes");
/// assert!(json.contains("\"engineName\": \"MXNet\""));
/// ```
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    model: ModelSection,
    runtime: Runtime,
    created_on: CreatedOn,
    engine: Option<EngineSection>,
    publisher: Option<Publisher>,
}

impl ManifestBuilder {
    /// Start a manifest for `model_name` served by `handler`.
    #[must_use]
    pub fn new(
        model_name: &ModelName,
        handler: impl Into<String>,
        runtime: Runtime,
        created_on: CreatedOn,
    ) -> Self {
        Self {
            model: ModelSection {
                model_name: model_name.as_str().to_owned(),
                handler: handler.into(),
            },
            runtime,
            created_on,
            engine: None,
            publisher: None,
        }
    }

    /// Set the serialization engine.
    #[must_use]
    pub fn engine(mut self, engine_name: Option<String>) -> Self {
        self.engine = engine_name.map(|engine_name| EngineSection { engine_name });
        self
    }

    /// Set the publisher.
    #[must_use]
    pub fn publisher(mut self, publisher: Option<Publisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Finish the manifest.
    #[must_use]
    pub fn build(self) -> Manifest {
        Manifest {
            created_on: self.created_on,
            runtime: self.runtime,
            model: self.model,
            engine: self.engine,
            publisher: self.publisher,
            archiver_version: ARCHIVER_VERSION.to_owned(),
        }
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
