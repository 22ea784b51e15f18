//! Import and export command handlers.

use std::path::PathBuf;

use noteport::api::{HttpTemplateApi, TemplateApi};
use noteport::config::NoteportConfig;
use noteport::io::{DirectorySink, ImportOptions, ImportProgress, ProgressCallback};
use noteport::status::ConsoleNotifier;
use noteport::transfer::{ExportOutcome, ImportOutcome, TemplateTransfer};

use super::AlreadyReported;

/// Executes the export command.
///
/// Fetches every template from the notes API and writes one artifact into
/// the output directory. Nothing is written when there are no templates.
pub async fn cmd_export(
    config: &NoteportConfig,
    output_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let api = HttpTemplateApi::from_config(&config.api);
    let templates = api.list_templates().await?;

    if templates.is_empty() {
        println!("No templates to export.");
        return Ok(());
    }

    let dir = output_dir.unwrap_or_else(|| config.export.output_dir.clone());
    let transfer = TemplateTransfer::new(api, ConsoleNotifier);
    let mut sink = DirectorySink::new(dir);

    match transfer.export(&templates, &mut sink) {
        ExportOutcome::Delivered(result) => {
            let location = result
                .location
                .map_or(result.file_name, |p| p.display().to_string());
            println!("Exported {} templates to {location}", result.exported);
            Ok(())
        },
        ExportOutcome::Failed(_) => Err(AlreadyReported.into()),
    }
}

/// Executes the import command.
///
/// A failed import has already been reported by the notifier, so it comes
/// back as [`AlreadyReported`].
pub async fn cmd_import(
    config: &NoteportConfig,
    file: PathBuf,
    dry_run: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let api = HttpTemplateApi::from_config(&config.api);
    let transfer = TemplateTransfer::new(api, ConsoleNotifier);
    transfer.select_file(file)?;

    let options = ImportOptions::default().with_dry_run(dry_run);
    let progress: Option<ProgressCallback> = verbose.then(|| {
        Box::new(|p: &ImportProgress| {
            eprintln!("  [{}/{}] created ({:.0}%)", p.current, p.total, p.percent_complete());
        }) as ProgressCallback
    });

    let outcome = transfer
        .import_selected(&options, progress, || {
            tracing::debug!("Import complete; template list is stale");
        })
        .await;

    match outcome {
        ImportOutcome::Completed(report) => {
            for warning in &report.warnings {
                eprintln!("warning: {warning}");
            }
            Ok(())
        },
        ImportOutcome::Failed(_) => Err(AlreadyReported.into()),
        ImportOutcome::NoFileSelected => Err("no file selected".into()),
        ImportOutcome::Busy => Err("an import is already running".into()),
    }
}
