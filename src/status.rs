//! User-visible status: busy flags, notifications and the file input.
//!
//! The busy flags are UI signals, not synchronization. They are shared
//! through an `Arc` so that whatever renders the controls can read them
//! while an operation is in flight.

use crate::io::is_artifact_path;
use crate::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Busy state of the two transfer operations.
#[derive(Debug, Default)]
pub struct StatusFlags {
    exporting: AtomicBool,
    importing: AtomicBool,
}

impl StatusFlags {
    /// Creates idle flags.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates idle flags behind a shareable handle.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns whether an export is in progress.
    #[must_use]
    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }

    /// Returns whether an import is in progress.
    #[must_use]
    pub fn is_importing(&self) -> bool {
        self.importing.load(Ordering::Acquire)
    }

    /// Marks an export as running until the guard is dropped.
    #[must_use = "the flag is cleared as soon as the guard is dropped"]
    pub fn begin_export(&self) -> BusyGuard<'_> {
        BusyGuard::set(&self.exporting)
    }

    /// Marks an import as running until the guard is dropped.
    #[must_use = "the flag is cleared as soon as the guard is dropped"]
    pub fn begin_import(&self) -> BusyGuard<'_> {
        BusyGuard::set(&self.importing)
    }
}

/// Holds a busy flag raised; lowers it on drop.
///
/// Dropping happens on every exit path, early returns and unwinding
/// included.
#[derive(Debug)]
pub struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn set(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self { flag }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Receives user-facing, human-readable notices.
pub trait Notifier {
    /// Shows a notice to the user.
    fn notify(&self, message: &str);
}

/// Prints notices to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        let _ = writeln!(std::io::stderr(), "{message}");
    }
}

/// Collects notices in memory.
///
/// Clones share the same message list, so a test can keep a handle while
/// the controller owns the notifier.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every notice so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

/// The import file picker.
///
/// Holds at most one selected file, restricted to the artifact extension.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileInput {
    selected: Option<PathBuf>,
}

impl FileInput {
    /// Creates an empty file input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a file, replacing any earlier selection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if the file does not have the `.json`
    /// extension; the previous selection is kept.
    pub fn select(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if !is_artifact_path(&path) {
            return Err(Error::Unsupported(format!(
                "only .json files can be imported: {}",
                path.display()
            )));
        }
        self.selected = Some(path);
        Ok(())
    }

    /// Returns the selected file.
    #[must_use]
    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_guard_sets_and_clears() {
        let flags = StatusFlags::new();
        assert!(!flags.is_exporting());
        {
            let _guard = flags.begin_export();
            assert!(flags.is_exporting());
            assert!(!flags.is_importing());
        }
        assert!(!flags.is_exporting());
    }

    #[test]
    fn test_busy_guard_clears_on_early_return() {
        fn failing(flags: &StatusFlags) -> Result<()> {
            let _guard = flags.begin_import();
            Err(Error::InvalidInput("nope".to_string()))
        }

        let flags = StatusFlags::new();
        assert!(failing(&flags).is_err());
        assert!(!flags.is_importing());
    }

    #[test]
    fn test_shared_flags_visible_through_clone() {
        let flags = StatusFlags::shared();
        let observer = Arc::clone(&flags);

        let guard = flags.begin_import();
        assert!(observer.is_importing());
        drop(guard);
        assert!(!observer.is_importing());
    }

    #[test]
    fn test_recording_notifier_shares_messages() {
        let notifier = RecordingNotifier::new();
        let handle = notifier.clone();
        notifier.notify("first");
        notifier.notify("second");
        assert_eq!(handle.messages(), vec!["first", "second"]);
    }

    #[test]
    fn test_file_input_accepts_json_only() {
        let mut input = FileInput::new();
        input.select("exports/templates-export-1.json").unwrap();
        assert_eq!(
            input.selected(),
            Some(Path::new("exports/templates-export-1.json"))
        );

        let err = input.select("notes.csv").unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
        // Rejected selection keeps the previous one
        assert!(input.selected().is_some());

        input.clear();
        assert!(input.selected().is_none());
    }
}
