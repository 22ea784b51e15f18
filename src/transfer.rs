//! Transfer controller.
//!
//! [`TemplateTransfer`] ties the two workflows to the status reporter. It is
//! the error boundary of the pipeline: every failure ends as exactly one
//! notice plus a `tracing` diagnostic, and nothing propagates to the caller
//! beyond the returned outcome.
//!
//! | Outcome | Notice |
//! |---------|--------|
//! | export succeeded | `Templates exported successfully` |
//! | export failed | `Failed to export templates` |
//! | import succeeded | `Imported N templates` |
//! | import dry run | `Validated N templates (dry run, nothing imported)` |
//! | import failed | `Failed to import templates: <reason>` |
//! | nothing selected, or already importing | none |
//!
//! Both operations take `&self`, so the busy flags can be read through
//! [`TemplateTransfer::status`] while an import is awaiting the API.

use crate::Result;
use crate::api::TemplateApi;
use crate::io::{
    ArtifactSink, ExportResult, ExportService, ImportError, ImportOptions, ImportReport,
    ImportService, ProgressCallback,
};
use crate::models::Template;
use crate::status::{FileInput, Notifier, StatusFlags};
use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::Arc;

/// Notice issued after a successful export.
pub const EXPORT_SUCCESS_NOTICE: &str = "Templates exported successfully";

/// Notice issued after a failed export.
pub const EXPORT_FAILURE_NOTICE: &str = "Failed to export templates";

/// Prefix of every import failure notice.
pub const IMPORT_FAILURE_NOTICE: &str = "Failed to import templates";

/// How an export ended.
#[derive(Debug)]
pub enum ExportOutcome {
    /// The artifact was delivered.
    Delivered(ExportResult),
    /// Encoding or delivery failed; nothing was delivered.
    Failed(crate::Error),
}

impl ExportOutcome {
    /// Returns whether the artifact was delivered.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

/// How an import ended.
#[derive(Debug)]
pub enum ImportOutcome {
    /// No file was selected; nothing happened.
    NoFileSelected,
    /// Another import is still running; nothing happened.
    Busy,
    /// Every record was created (or validated, for a dry run).
    Completed(ImportReport),
    /// The import stopped; see the error for how far it got.
    Failed(ImportError),
}

impl ImportOutcome {
    /// Returns whether the import completed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Clears the file input when dropped.
struct ResetOnDrop<'a>(&'a RefCell<FileInput>);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        self.0.borrow_mut().clear();
    }
}

/// Export/import controller with user-visible status.
///
/// The file input is never borrowed across an await point.
pub struct TemplateTransfer<A: TemplateApi, N: Notifier> {
    api: A,
    notifier: N,
    status: Arc<StatusFlags>,
    file_input: RefCell<FileInput>,
    exporter: ExportService,
}

impl<A: TemplateApi, N: Notifier> TemplateTransfer<A, N> {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(api: A, notifier: N) -> Self {
        Self::with_status(api, notifier, StatusFlags::shared())
    }

    /// Creates a controller that raises its busy flags on `status`.
    #[must_use]
    pub fn with_status(api: A, notifier: N, status: Arc<StatusFlags>) -> Self {
        Self {
            api,
            notifier,
            status,
            file_input: RefCell::new(FileInput::new()),
            exporter: ExportService::new(),
        }
    }

    /// Returns the API client.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Returns the notifier.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Returns the busy flags.
    #[must_use]
    pub fn status(&self) -> &StatusFlags {
        &self.status
    }

    /// Returns a shareable handle to the busy flags.
    #[must_use]
    pub fn status_handle(&self) -> Arc<StatusFlags> {
        Arc::clone(&self.status)
    }

    /// Selects the file the next import reads.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Unsupported`] for anything but a `.json` file.
    pub fn select_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        self.file_input.borrow_mut().select(path)
    }

    /// Returns the selected file.
    #[must_use]
    pub fn selected_file(&self) -> Option<PathBuf> {
        self.file_input.borrow().selected().map(ToOwned::to_owned)
    }

    /// Exports `templates` and delivers the artifact to `sink`.
    ///
    /// `exporting` is raised for the duration of the call.
    pub fn export(&self, templates: &[Template], sink: &mut dyn ArtifactSink) -> ExportOutcome {
        let _busy = self.status.begin_export();

        match self.exporter.export(templates, sink) {
            Ok(result) => {
                self.notifier.notify(EXPORT_SUCCESS_NOTICE);
                ExportOutcome::Delivered(result)
            },
            Err(e) => {
                tracing::error!(error = %e, count = templates.len(), "Template export failed");
                self.notifier.notify(EXPORT_FAILURE_NOTICE);
                ExportOutcome::Failed(e)
            },
        }
    }

    /// Imports the selected file.
    ///
    /// `on_complete` runs exactly once, after the success notice, and only
    /// when every record was created. It does not run for a dry run.
    /// `importing` is raised and the file input is cleared on every exit
    /// path. A call made while another import is running returns
    /// [`ImportOutcome::Busy`] and leaves the selection alone.
    pub async fn import_selected<F>(
        &self,
        options: &ImportOptions,
        progress: Option<ProgressCallback>,
        on_complete: F,
    ) -> ImportOutcome
    where
        F: FnOnce(),
    {
        if self.status.is_importing() {
            tracing::debug!("Import requested while another import is running");
            return ImportOutcome::Busy;
        }
        let Some(path) = self.selected_file() else {
            return ImportOutcome::NoFileSelected;
        };

        let _busy = self.status.begin_import();
        let _reset = ResetOnDrop(&self.file_input);

        let result = ImportService::new(&self.api)
            .import_from_file(&path, options, progress)
            .await;

        match result {
            Ok(report) if report.dry_run => {
                self.notifier.notify(&format!(
                    "Validated {} templates (dry run, nothing imported)",
                    report.imported
                ));
                ImportOutcome::Completed(report)
            },
            Ok(report) => {
                self.notifier
                    .notify(&format!("Imported {} templates", report.imported));
                on_complete();
                ImportOutcome::Completed(report)
            },
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %path.display(),
                    created = e.created(),
                    "Template import failed"
                );
                self.notifier
                    .notify(&format!("{IMPORT_FAILURE_NOTICE}: {}", e.reason()));
                ImportOutcome::Failed(e)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::io::{DeliveredArtifact, DirectorySink, MemorySink};
    use crate::models::TemplatePayload;
    use crate::status::RecordingNotifier;
    use std::cell::Cell;
    use std::io::Write as _;
    use std::sync::Mutex;

    struct EchoApi;

    impl TemplateApi for EchoApi {
        async fn create_template(&self, payload: &TemplatePayload) -> Result<Template> {
            Ok(Template::from(payload.clone()).with_field("templateId", 99))
        }

        async fn list_templates(&self) -> Result<Vec<Template>> {
            Ok(Vec::new())
        }
    }

    struct RejectingApi;

    impl TemplateApi for RejectingApi {
        async fn create_template(&self, _payload: &TemplatePayload) -> Result<Template> {
            Err(Error::Api {
                status: 400,
                message: "bad".to_string(),
            })
        }

        async fn list_templates(&self) -> Result<Vec<Template>> {
            Ok(Vec::new())
        }
    }

    /// Records the `importing` flag each time a create arrives.
    struct FlagRecordingApi {
        status: Arc<StatusFlags>,
        seen: Mutex<Vec<bool>>,
    }

    impl TemplateApi for FlagRecordingApi {
        async fn create_template(&self, payload: &TemplatePayload) -> Result<Template> {
            self.seen.lock().unwrap().push(self.status.is_importing());
            Ok(Template::from(payload.clone()))
        }

        async fn list_templates(&self) -> Result<Vec<Template>> {
            Ok(Vec::new())
        }
    }

    /// Records the `exporting` flag at delivery time.
    struct FlagRecordingSink {
        status: Arc<StatusFlags>,
        exporting_at_delivery: Option<bool>,
    }

    impl ArtifactSink for FlagRecordingSink {
        fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<DeliveredArtifact> {
            self.exporting_at_delivery = Some(self.status.is_exporting());
            Ok(DeliveredArtifact {
                file_name: file_name.to_string(),
                location: None,
                bytes: bytes.len(),
            })
        }
    }

    fn write_artifact(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("templates-export-1.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    const TWO: &str = r#"{"version":"1.0","exportDate":"2026-10-18T09:30:12.345Z","templates":[{"name":"A"},{"name":"B"}]}"#;

    #[test]
    fn test_export_notifies_success() {
        let notifier = RecordingNotifier::new();
        let transfer = TemplateTransfer::new(EchoApi, notifier.clone());
        let mut sink = MemorySink::new();

        let outcome = transfer.export(&[Template::new().with_field("name", "A")], &mut sink);

        assert!(outcome.is_success());
        assert_eq!(notifier.messages(), vec![EXPORT_SUCCESS_NOTICE]);
        assert!(!transfer.status().is_exporting());
    }

    #[test]
    fn test_exporting_raised_during_delivery() {
        let transfer = TemplateTransfer::new(EchoApi, RecordingNotifier::new());
        let mut sink = FlagRecordingSink {
            status: transfer.status_handle(),
            exporting_at_delivery: None,
        };

        let outcome = transfer.export(&[], &mut sink);

        assert!(outcome.is_success());
        assert_eq!(sink.exporting_at_delivery, Some(true));
        assert!(!transfer.status().is_exporting());
    }

    #[test]
    fn test_export_failure_clears_flag() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let notifier = RecordingNotifier::new();
        let transfer = TemplateTransfer::new(EchoApi, notifier.clone());
        let mut sink = DirectorySink::new(&blocker);

        let outcome = transfer.export(&[], &mut sink);

        assert!(matches!(outcome, ExportOutcome::Failed(_)));
        assert_eq!(notifier.messages(), vec![EXPORT_FAILURE_NOTICE]);
        assert!(!transfer.status().is_exporting());
    }

    #[tokio::test]
    async fn test_import_without_selection_is_noop() {
        let notifier = RecordingNotifier::new();
        let transfer = TemplateTransfer::new(EchoApi, notifier.clone());
        let called = Cell::new(0);

        let outcome = transfer
            .import_selected(&ImportOptions::default(), None, || called.set(called.get() + 1))
            .await;

        assert!(matches!(outcome, ImportOutcome::NoFileSelected));
        assert!(notifier.messages().is_empty());
        assert_eq!(called.get(), 0);
    }

    #[tokio::test]
    async fn test_importing_raised_during_creates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(&dir, TWO);
        let status = StatusFlags::shared();
        let api = FlagRecordingApi {
            status: Arc::clone(&status),
            seen: Mutex::new(Vec::new()),
        };
        let transfer = TemplateTransfer::with_status(api, RecordingNotifier::new(), status);
        transfer.select_file(&path).unwrap();

        let outcome = transfer
            .import_selected(&ImportOptions::default(), None, || {})
            .await;

        assert!(outcome.is_success());
        assert_eq!(*transfer.api().seen.lock().unwrap(), vec![true, true]);
        assert!(!transfer.status().is_importing());
    }

    #[tokio::test]
    async fn test_import_while_importing_is_busy() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(&dir, TWO);
        let notifier = RecordingNotifier::new();
        let transfer = TemplateTransfer::new(EchoApi, notifier.clone());
        transfer.select_file(&path).unwrap();

        let outcome = {
            let _running = transfer.status().begin_import();
            transfer
                .import_selected(&ImportOptions::default(), None, || {})
                .await
        };

        assert!(matches!(outcome, ImportOutcome::Busy));
        assert!(notifier.messages().is_empty());
        assert_eq!(transfer.selected_file(), Some(path));
    }

    #[tokio::test]
    async fn test_import_success_notifies_then_completes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(&dir, TWO);
        let notifier = RecordingNotifier::new();
        let transfer = TemplateTransfer::new(EchoApi, notifier.clone());
        transfer.select_file(&path).unwrap();

        let seen_at_completion = Cell::new(None);
        let outcome = transfer
            .import_selected(&ImportOptions::default(), None, || {
                seen_at_completion.set(Some(notifier.messages().len()));
            })
            .await;

        assert!(outcome.is_success());
        assert_eq!(notifier.messages(), vec!["Imported 2 templates"]);
        // The notice was already out when the callback ran
        assert_eq!(seen_at_completion.get(), Some(1));
        assert!(!transfer.status().is_importing());
        assert!(transfer.selected_file().is_none());
    }

    #[tokio::test]
    async fn test_import_failure_resets_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(&dir, TWO);
        let notifier = RecordingNotifier::new();
        let transfer = TemplateTransfer::new(RejectingApi, notifier.clone());
        transfer.select_file(&path).unwrap();
        let called = Cell::new(false);

        let outcome = transfer
            .import_selected(&ImportOptions::default(), None, || called.set(true))
            .await;

        assert!(matches!(
            outcome,
            ImportOutcome::Failed(ImportError::CreateFailed { index: 1, .. })
        ));
        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with(IMPORT_FAILURE_NOTICE));
        assert!(!called.get());
        assert!(!transfer.status().is_importing());
        assert!(transfer.selected_file().is_none());
    }

    #[tokio::test]
    async fn test_dry_run_skips_completion() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(&dir, TWO);
        let notifier = RecordingNotifier::new();
        let transfer = TemplateTransfer::new(RejectingApi, notifier.clone());
        transfer.select_file(&path).unwrap();
        let called = Cell::new(false);

        let outcome = transfer
            .import_selected(
                &ImportOptions::default().with_dry_run(true),
                None,
                || called.set(true),
            )
            .await;

        assert!(outcome.is_success());
        assert_eq!(
            notifier.messages(),
            vec!["Validated 2 templates (dry run, nothing imported)"]
        );
        assert!(!called.get());
    }
}
