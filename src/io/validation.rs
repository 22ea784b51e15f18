//! Import validation and normalization.
//!
//! Checks artifact metadata before any create call is issued and strips
//! server-assigned fields from each template.

use super::artifact::{FORMAT_VERSION, ParsedArtifact};
use crate::models::{ServerField, Template, TemplatePayload};
use chrono::DateTime;

/// Major format revision this build reads.
const SUPPORTED_MAJOR: u32 = 1;

/// Severity of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    /// Warning: issue noted but import can proceed.
    Warning,
    /// Error: the artifact must not be imported.
    Error,
}

/// A validation issue found in an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The artifact field that has an issue.
    pub field: String,
    /// Description of the issue.
    pub message: String,
    /// Severity of the issue.
    pub severity: ValidationSeverity,
}

impl ValidationIssue {
    /// Creates a warning issue.
    #[must_use]
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Warning,
        }
    }

    /// Creates an error issue.
    #[must_use]
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Error,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of validating an artifact.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Issues found during validation.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns whether the artifact may be imported.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Error)
    }

    /// Returns the blocking issues.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Error)
    }

    /// Returns the non-blocking issues.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Warning)
    }
}

/// Validates artifact metadata.
///
/// # Version policy
///
/// `version` must be present with major revision `1`. A newer minor revision
/// (`1.3`) is accepted with a warning; anything else is rejected. A missing
/// or unparsable `exportDate` is only a warning since nothing depends on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactValidator;

impl ArtifactValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a parsed artifact.
    #[must_use]
    pub fn validate(&self, artifact: &ParsedArtifact) -> ValidationResult {
        let mut result = ValidationResult::default();

        match artifact.version.as_deref() {
            None => result
                .issues
                .push(ValidationIssue::error("version", "missing format version")),
            Some(version) => {
                if let Some(issue) = check_version(version) {
                    result.issues.push(issue);
                }
            },
        }

        match artifact.export_date.as_deref() {
            None => result
                .issues
                .push(ValidationIssue::warning("exportDate", "missing export date")),
            Some(date) if DateTime::parse_from_rfc3339(date).is_err() => {
                result.issues.push(ValidationIssue::warning(
                    "exportDate",
                    format!("'{date}' is not an ISO-8601 timestamp"),
                ));
            },
            Some(_) => {},
        }

        result
    }
}

/// Checks a version string against the supported revision.
fn check_version(version: &str) -> Option<ValidationIssue> {
    let mut parts = version.trim().splitn(2, '.');
    let major = parts.next().and_then(|m| m.parse::<u32>().ok());
    let minor = match parts.next() {
        None => Some(0),
        Some(m) => m.parse::<u32>().ok(),
    };

    match (major, minor) {
        (Some(SUPPORTED_MAJOR), Some(0)) => None,
        (Some(SUPPORTED_MAJOR), Some(_)) => Some(ValidationIssue::warning(
            "version",
            format!("'{version}' is newer than {FORMAT_VERSION}; unknown fields are passed through"),
        )),
        _ => Some(ValidationIssue::error(
            "version",
            format!("unsupported format version '{version}' (expected {SUPPORTED_MAJOR}.x)"),
        )),
    }
}

/// Strips server-assigned fields from templates.
///
/// The destination assigns new identity and usage metadata, so an import
/// never carries over `templateId`, `createdAt`, `updatedAt`, `usageCount`
/// or `lastUsedAt`, whether they were present or not.
#[derive(Debug, Clone, Copy)]
pub struct TemplateNormalizer {
    stripped: &'static [ServerField],
}

impl Default for TemplateNormalizer {
    fn default() -> Self {
        Self {
            stripped: ServerField::all(),
        }
    }
}

impl TemplateNormalizer {
    /// Creates a normalizer that strips every [`ServerField`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a payload copy of the template; the original is untouched.
    #[must_use]
    pub fn normalize(&self, template: &Template) -> TemplatePayload {
        self.normalize_owned(template.clone())
    }

    /// Consumes the template and returns its payload.
    #[must_use]
    pub fn normalize_owned(&self, template: Template) -> TemplatePayload {
        let mut map = template.into_map();
        for field in self.stripped {
            // shift_remove keeps the remaining keys in their original order
            map.shift_remove(field.wire_name());
        }
        TemplatePayload::from_normalized(map)
    }
}
