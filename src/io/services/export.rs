//! Template export service.
//!
//! Builds an artifact from an in-memory collection, encodes it, and hands it
//! to a sink.

use crate::io::artifact::Artifact;
use crate::io::codec::encode_artifact;
use crate::io::sink::ArtifactSink;
use crate::models::Template;
use crate::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::instrument;

/// Result of an export operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    /// Number of templates written.
    pub exported: usize,
    /// File name the artifact was delivered under.
    pub file_name: String,
    /// Output path (if file export).
    pub location: Option<PathBuf>,
    /// Size of the encoded artifact.
    pub bytes: usize,
}

impl ExportResult {
    /// Returns whether any templates were exported.
    #[must_use]
    pub const fn has_exports(&self) -> bool {
        self.exported > 0
    }
}

/// Service for exporting templates to an artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportService;

impl ExportService {
    /// Creates a new export service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Exports templates, stamping the artifact with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or delivery fails.
    pub fn export(&self, templates: &[Template], sink: &mut dyn ArtifactSink) -> Result<ExportResult> {
        self.export_at(templates, Utc::now(), sink)
    }

    /// Exports templates with an explicit export time.
    ///
    /// The collection is cloned into the artifact; callers keep ownership of
    /// their templates and nothing is normalized.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or delivery fails.
    #[instrument(skip(self, templates, sink), fields(count = templates.len()))]
    pub fn export_at(
        &self,
        templates: &[Template],
        at: DateTime<Utc>,
        sink: &mut dyn ArtifactSink,
    ) -> Result<ExportResult> {
        let artifact = Artifact::new(templates, at);
        let bytes = encode_artifact(&artifact)?;
        let delivered = sink.deliver(&artifact.file_name(), &bytes)?;

        tracing::info!(
            exported = artifact.templates.len(),
            file_name = %delivered.file_name,
            bytes = delivered.bytes,
            "Templates exported"
        );

        Ok(ExportResult {
            exported: artifact.templates.len(),
            file_name: delivered.file_name,
            location: delivered.location,
            bytes: delivered.bytes,
        })
    }
}
