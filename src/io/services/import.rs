//! Template import service.
//!
//! Replays an artifact against the notes API as a sequence of independent
//! create calls.
//!
//! # Ordering
//!
//! Creates are strictly sequential: record *i + 1* is normalized and
//! submitted only after the create call for record *i* has resolved. At most
//! one create is in flight, and creation order equals artifact order.
//!
//! # Failure policy
//!
//! The first rejected create aborts the batch. Records created before it
//! stay created (there is no rollback) and later records are never sent.

#![allow(clippy::cast_precision_loss)]

use crate::api::TemplateApi;
use crate::io::artifact::ParsedArtifact;
use crate::io::codec::decode_artifact;
use crate::io::validation::{ArtifactValidator, TemplateNormalizer};
use crate::models::Template;
use std::path::Path;
use thiserror::Error as ThisError;
use tracing::instrument;

/// Options for template import.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Validate and normalize without issuing any create call.
    pub dry_run: bool,
}

impl ImportOptions {
    /// Enables or disables dry run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Progress callback for import operations.
pub type ProgressCallback = Box<dyn Fn(&ImportProgress) + Send>;

/// Progress information during import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportProgress {
    /// Record just created (1-indexed).
    pub current: usize,
    /// Records in the artifact.
    pub total: usize,
}

impl ImportProgress {
    /// Returns the percentage complete (0-100).
    #[must_use]
    pub fn percent_complete(&self) -> f32 {
        if self.total == 0 {
            100.0
        } else {
            (self.current as f32 / self.total as f32) * 100.0
        }
    }
}

/// Result of a completed import.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Number of templates created (or that would be, in a dry run).
    pub imported: usize,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Templates as returned by the server, in creation order.
    pub created: Vec<Template>,
    /// Non-blocking validation findings.
    pub warnings: Vec<String>,
}

impl ImportReport {
    /// Returns whether any records were imported.
    #[must_use]
    pub const fn has_imports(&self) -> bool {
        self.imported > 0
    }
}

/// Why an import stopped.
#[derive(Debug, ThisError)]
pub enum ImportError {
    /// The selected file could not be read as text.
    #[error("could not read '{path}': {cause}")]
    Read {
        /// File that was selected.
        path: String,
        /// Underlying I/O error.
        cause: String,
    },

    /// The file is not a template export.
    ///
    /// Raised before any create call is issued.
    #[error("{0}")]
    Malformed(String),

    /// The artifact's format revision is not supported.
    ///
    /// Raised before any create call is issued.
    #[error("{0}")]
    UnsupportedVersion(String),

    /// A create call was rejected; the batch stopped there.
    #[error("record {index} of {total} was rejected after {created} created: {source}")]
    CreateFailed {
        /// 1-based position of the rejected record in the artifact.
        index: usize,
        /// Records in the artifact.
        total: usize,
        /// Records created before the failure (they are not rolled back).
        created: usize,
        /// Error returned by the API.
        #[source]
        source: crate::Error,
    },
}

impl ImportError {
    /// Returns how many templates were created before the import stopped.
    #[must_use]
    pub const fn created(&self) -> usize {
        match self {
            Self::CreateFailed { created, .. } => *created,
            _ => 0,
        }
    }

    /// Returns a short, user-facing reason.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Read { .. } => "the file could not be read".to_string(),
            Self::Malformed(_) => "the file is not a valid template export".to_string(),
            Self::UnsupportedVersion(_) => "the export format version is not supported".to_string(),
            Self::CreateFailed {
                index,
                total,
                created,
                ..
            } => format!("template {index} of {total} was rejected ({created} already imported)"),
        }
    }
}

/// Service for importing templates through a [`TemplateApi`].
pub struct ImportService<'a, A: TemplateApi> {
    api: &'a A,
    validator: ArtifactValidator,
    normalizer: TemplateNormalizer,
}

impl<'a, A: TemplateApi> ImportService<'a, A> {
    /// Creates a new import service.
    #[must_use]
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            validator: ArtifactValidator::new(),
            normalizer: TemplateNormalizer::new(),
        }
    }

    /// Imports templates from an artifact file.
    ///
    /// The whole file is read into memory before parsing.
    ///
    /// # Errors
    ///
    /// See [`ImportError`].
    #[instrument(skip(self, options, progress), fields(path = %path.display()))]
    pub async fn import_from_file(
        &self,
        path: &Path,
        options: &ImportOptions,
        progress: Option<ProgressCallback>,
    ) -> Result<ImportReport, ImportError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ImportError::Read {
                path: path.display().to_string(),
                cause: e.to_string(),
            })?;

        self.import_from_str(&text, options, progress).await
    }

    /// Imports templates from artifact text.
    ///
    /// # Errors
    ///
    /// See [`ImportError`].
    pub async fn import_from_str(
        &self,
        text: &str,
        options: &ImportOptions,
        progress: Option<ProgressCallback>,
    ) -> Result<ImportReport, ImportError> {
        let artifact = decode_artifact(text).map_err(|e| match e {
            crate::Error::InvalidInput(message) => ImportError::Malformed(message),
            other => ImportError::Malformed(other.to_string()),
        })?;
        self.import_artifact(artifact, options, progress).await
    }

    /// Validates an artifact, then runs the create batch.
    ///
    /// # Errors
    ///
    /// See [`ImportError`].
    pub async fn import_artifact(
        &self,
        artifact: ParsedArtifact,
        options: &ImportOptions,
        progress: Option<ProgressCallback>,
    ) -> Result<ImportReport, ImportError> {
        let validation = self.validator.validate(&artifact);
        if let Some(issue) = validation.errors().next() {
            return Err(ImportError::UnsupportedVersion(issue.to_string()));
        }

        let warnings: Vec<String> = validation.warnings().map(ToString::to_string).collect();
        for warning in &warnings {
            tracing::warn!(%warning, "Artifact validation warning");
        }

        let mut report = self
            .import_templates(artifact.templates, options, progress)
            .await?;
        report.warnings = warnings;
        Ok(report)
    }

    /// Creates each template in order, stopping at the first rejection.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::CreateFailed`] for the first rejected record.
    pub async fn import_templates(
        &self,
        templates: Vec<Template>,
        options: &ImportOptions,
        progress: Option<ProgressCallback>,
    ) -> Result<ImportReport, ImportError> {
        let total = templates.len();
        let mut report = ImportReport {
            dry_run: options.dry_run,
            ..ImportReport::default()
        };

        tracing::info!(total, dry_run = options.dry_run, "Starting template import");

        // Each record is normalized only once the previous create has resolved.
        for (position, template) in templates.into_iter().enumerate() {
            let index = position + 1;
            let payload = self.normalizer.normalize_owned(template);

            if options.dry_run {
                report.imported += 1;
                continue;
            }

            tracing::debug!(index, total, name = ?payload.name(), "Submitting template");
            match self.api.create_template(&payload).await {
                Ok(created) => {
                    report.imported += 1;
                    report.created.push(created);
                    if let Some(ref cb) = progress {
                        cb(&ImportProgress {
                            current: index,
                            total,
                        });
                    }
                },
                Err(source) => {
                    tracing::error!(
                        index,
                        total,
                        created = report.imported,
                        error = %source,
                        "Template create rejected; aborting import"
                    );
                    return Err(ImportError::CreateFailed {
                        index,
                        total,
                        created: report.imported,
                        source,
                    });
                },
            }
        }

        tracing::info!(imported = report.imported, "Template import finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TemplatePayload;
    use crate::{Error, Result};
    use std::sync::{Arc, Mutex};

    /// Records payloads in call order and fails the configured call.
    #[derive(Default)]
    struct ScriptedApi {
        calls: Mutex<Vec<TemplatePayload>>,
        fail_on: Option<usize>,
    }

    impl ScriptedApi {
        fn failing_on(call: usize) -> Self {
            Self {
                fail_on: Some(call),
                ..Self::default()
            }
        }

        fn names(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|p| p.name().unwrap_or_default().to_string())
                .collect()
        }
    }

    impl TemplateApi for ScriptedApi {
        async fn create_template(&self, payload: &TemplatePayload) -> Result<Template> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(payload.clone());
                calls.len()
            };
            if self.fail_on == Some(call) {
                return Err(Error::Api {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(Template::from(payload.clone()).with_field("templateId", call))
        }

        async fn list_templates(&self) -> Result<Vec<Template>> {
            Ok(Vec::new())
        }
    }

    const ARTIFACT: &str = r#"{
        "version": "1.0",
        "exportDate": "2026-10-18T09:30:12.345Z",
        "templates": [
            {"templateId": 10, "name": "A", "usageCount": 4},
            {"templateId": 11, "name": "B", "createdAt": "2026-01-01T00:00:00Z"},
            {"templateId": 12, "name": "C", "lastUsedAt": null}
        ]
    }"#;

    #[test]
    fn test_import_options_defaults() {
        let options = ImportOptions::default();
        assert!(!options.dry_run);
        assert!(options.with_dry_run(true).dry_run);
    }

    #[test]
    fn test_import_progress_percent() {
        let progress = ImportProgress {
            current: 1,
            total: 4,
        };
        assert!((progress.percent_complete() - 25.0).abs() < f32::EPSILON);
        assert!((ImportProgress::default().percent_complete() - 100.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_import_creates_in_order() {
        let api = ScriptedApi::default();
        let report = ImportService::new(&api)
            .import_from_str(ARTIFACT, &ImportOptions::default(), None)
            .await
            .unwrap();

        assert_eq!(report.imported, 3);
        assert_eq!(api.names(), vec!["A", "B", "C"]);
        assert_eq!(report.created.len(), 3);
        assert!(report.warnings.is_empty());
        for payload in api.calls.lock().unwrap().iter() {
            assert!(!payload.contains_key("templateId"));
            assert!(!payload.contains_key("usageCount"));
            assert!(!payload.contains_key("createdAt"));
            assert!(!payload.contains_key("lastUsedAt"));
        }
    }

    #[tokio::test]
    async fn test_import_aborts_on_first_failure() {
        let api = ScriptedApi::failing_on(2);
        let err = ImportService::new(&api)
            .import_from_str(ARTIFACT, &ImportOptions::default(), None)
            .await
            .unwrap_err();

        assert_eq!(api.names(), vec!["A", "B"]);
        match err {
            ImportError::CreateFailed {
                index,
                total,
                created,
                ..
            } => {
                assert_eq!((index, total, created), (2, 3, 1));
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_artifact_issues_no_calls() {
        let api = ScriptedApi::default();
        let err = ImportService::new(&api)
            .import_from_str("{ nope", &ImportOptions::default(), None)
            .await
            .unwrap_err();

        match &err {
            ImportError::Malformed(message) => assert!(message.starts_with("malformed artifact")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(api.names().is_empty());
    }

    #[tokio::test]
    async fn test_import_accepts_byte_order_mark() {
        let api = ScriptedApi::default();
        let text = format!("\u{feff}{ARTIFACT}");
        let report = ImportService::new(&api)
            .import_from_str(&text, &ImportOptions::default(), None)
            .await
            .unwrap();

        assert_eq!(report.imported, 3);
        assert_eq!(api.names(), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_unsupported_version_issues_no_calls() {
        let api = ScriptedApi::default();
        let text = r#"{"version": "2.0", "exportDate": "2026-10-18T09:30:12Z", "templates": [{"name": "A"}]}"#;
        let err = ImportService::new(&api)
            .import_from_str(text, &ImportOptions::default(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::UnsupportedVersion(_)));
        assert_eq!(err.created(), 0);
        assert!(api.names().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_issues_no_calls() {
        let api = ScriptedApi::default();
        let report = ImportService::new(&api)
            .import_from_str(ARTIFACT, &ImportOptions::default().with_dry_run(true), None)
            .await
            .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.imported, 3);
        assert!(report.created.is_empty());
        assert!(api.names().is_empty());
    }

    #[tokio::test]
    async fn test_progress_reported_after_each_create() {
        let api = ScriptedApi::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressCallback = Box::new(move |p: &ImportProgress| {
            sink.lock().unwrap().push((p.current, p.total));
        });

        ImportService::new(&api)
            .import_from_str(ARTIFACT, &ImportOptions::default(), Some(callback))
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[tokio::test]
    async fn test_missing_export_date_is_a_warning() {
        let api = ScriptedApi::default();
        let report = ImportService::new(&api)
            .import_from_str(
                r#"{"version": "1.0", "templates": [{"name": "A"}]}"#,
                &ImportOptions::default(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let api = ScriptedApi::default();
        let err = ImportService::new(&api)
            .import_from_file(
                Path::new("/nonexistent/templates.json"),
                &ImportOptions::default(),
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::Read { .. }));
        assert_eq!(err.reason(), "the file could not be read");
    }
}
