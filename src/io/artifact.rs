//! The export artifact container.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "exportDate": "2026-10-18T09:30:12.345Z",
//!   "templates": [ { "templateId": 1, "name": "Standup", ... } ]
//! }
//! ```

use crate::models::Template;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Format revision written into every new artifact.
pub const FORMAT_VERSION: &str = "1.0";

/// File extension accepted by import and produced by export.
pub const ARTIFACT_EXTENSION: &str = "json";

/// File name prefix for exported artifacts.
const FILE_NAME_PREFIX: &str = "templates-export-";

/// A template collection ready to be written out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Format revision marker.
    pub version: String,
    /// When the export was taken.
    #[serde(serialize_with = "serialize_export_date")]
    pub export_date: DateTime<Utc>,
    /// Templates in export order, unmodified.
    pub templates: Vec<Template>,
}

impl Artifact {
    /// Builds an artifact at the current format revision.
    ///
    /// Templates are cloned verbatim; export performs no normalization.
    #[must_use]
    pub fn new(templates: &[Template], export_date: DateTime<Utc>) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            export_date,
            templates: templates.to_vec(),
        }
    }

    /// Returns the file name the artifact is delivered under.
    #[must_use]
    pub fn file_name(&self) -> String {
        export_file_name(self.export_date)
    }
}

/// An artifact as read back from a file.
///
/// `version` and `exportDate` are optional here so that their absence is
/// reported by validation rather than as a parse error. `templates` must be
/// an array of JSON objects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedArtifact {
    /// Format revision marker, if present.
    #[serde(default)]
    pub version: Option<String>,
    /// Export timestamp as written, if present.
    #[serde(default)]
    pub export_date: Option<String>,
    /// Templates in artifact order.
    pub templates: Vec<Template>,
}

/// Returns `templates-export-<epoch-millis>.json` for the given instant.
#[must_use]
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!(
        "{FILE_NAME_PREFIX}{}.{ARTIFACT_EXTENSION}",
        at.timestamp_millis()
    )
}

/// Returns whether a path passes the import file filter (`.json`).
#[must_use]
pub fn is_artifact_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ARTIFACT_EXTENSION))
}

/// Writes the timestamp with millisecond precision and a `Z` suffix.
fn serialize_export_date<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
}
