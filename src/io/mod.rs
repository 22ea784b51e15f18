//! Template import/export I/O subsystem.
//!
//! Moves a user's templates between installations as a single JSON file.
//!
//! # Architecture
//!
//! - [`artifact`] defines the versioned envelope written on export
//! - [`codec`] turns artifacts into bytes and back
//! - [`validation`] checks artifact metadata and strips server fields
//! - [`sink`] delivers exported bytes to the user
//! - [`services`] orchestrate the two workflows
//!
//! # Artifact format
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "exportDate": "2026-10-18T09:30:12.345Z",
//!   "templates": [ { "name": "Standup", "content": "..." } ]
//! }
//! ```
//!
//! Templates are exported verbatim, server fields included. They are
//! stripped on import instead.
//!
//! # Examples
//!
//! ```rust,ignore
//! use noteport::io::{DirectorySink, ExportService};
//!
//! let mut sink = DirectorySink::new("exports");
//! let result = ExportService::new().export(&templates, &mut sink)?;
//! println!("Exported {} templates", result.exported);
//! ```

pub mod artifact;
pub mod codec;
pub mod services;
pub mod sink;
pub mod validation;

pub use artifact::{
    ARTIFACT_EXTENSION, Artifact, FORMAT_VERSION, ParsedArtifact, export_file_name,
    is_artifact_path,
};
pub use codec::{decode_artifact, encode_artifact};
pub use services::export::{ExportResult, ExportService};
pub use services::import::{
    ImportError, ImportOptions, ImportProgress, ImportReport, ImportService, ProgressCallback,
};
pub use sink::{ArtifactSink, DeliveredArtifact, DirectorySink, MemorySink};
pub use validation::{
    ArtifactValidator, TemplateNormalizer, ValidationIssue, ValidationResult, ValidationSeverity,
};
