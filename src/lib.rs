//! # Noteport
//!
//! Template import/export pipeline for a notes application.
//!
//! Noteport serializes a collection of note templates to a portable JSON
//! artifact and replays such an artifact against the notes API, one create
//! call at a time.
//!
//! ## Features
//!
//! - Stable, human-readable artifact format (`version`, `exportDate`, `templates`)
//! - Normalization that strips server-assigned identity and usage fields
//! - Strictly sequential create calls with abort-on-first-failure
//! - Busy flags, a notification sink, and guaranteed cleanup on every exit path
//!
//! ## Example
//!
//! ```rust,ignore
//! use noteport::api::HttpTemplateApi;
//! use noteport::io::ImportOptions;
//! use noteport::status::ConsoleNotifier;
//! use noteport::transfer::TemplateTransfer;
//!
//! let api = HttpTemplateApi::from_config(&config.api);
//! let transfer = TemplateTransfer::new(api, ConsoleNotifier);
//! transfer.select_file("templates-export-1760779812345.json")?;
//! let outcome = transfer
//!     .import_selected(&ImportOptions::default(), None, || refresh())
//!     .await;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod api;
pub mod config;
pub mod io;
pub mod models;
pub mod observability;
pub mod status;
pub mod transfer;

// Re-exports for convenience
pub use api::{HttpTemplateApi, TemplateApi};
pub use config::NoteportConfig;
pub use io::{Artifact, ExportService, ImportError, ImportOptions, ImportReport, ImportService};
pub use models::{Template, TemplatePayload};
pub use transfer::{ExportOutcome, ImportOutcome, TemplateTransfer};

/// Error type for noteport operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed artifact, bad export file name, bad config values |
/// | `OperationFailed` | I/O errors, serialization failures, transport errors |
/// | `Api` | The notes API answered with a non-success status |
/// | `Unsupported` | Selecting a file without the `.json` extension |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The notes API rejected a request.
    ///
    /// Raised when the server answers with a 4xx or 5xx status. The body is
    /// kept verbatim for diagnostics.
    #[error("api returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The requested input is not supported.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Result type alias for noteport operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::OperationFailed {
            operation: "test".to_string(),
            cause: "failed".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'test' failed: failed");

        let err = Error::Api {
            status: 422,
            message: "name is required".to_string(),
        };
        assert_eq!(err.to_string(), "api returned 422: name is required");
    }
}
