//! Artifact delivery.
//!
//! A sink receives the encoded artifact and its file name and makes it
//! available to the user. Delivery is all-or-nothing: a failed delivery
//! leaves no partial file behind.

use crate::{Error, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where a delivered artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredArtifact {
    /// File name the artifact was delivered under.
    pub file_name: String,
    /// Filesystem location, for sinks that write to disk.
    pub location: Option<PathBuf>,
    /// Number of bytes delivered.
    pub bytes: usize,
}

/// Destination for exported artifacts.
pub trait ArtifactSink {
    /// Delivers the encoded artifact under the given file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact could not be delivered in full.
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<DeliveredArtifact>;
}

/// Writes artifacts into a directory.
///
/// The bytes go to a hidden `.partial` file first, which is flushed, closed
/// and then renamed into place. The file handle is released before
/// `deliver` returns.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink writing into `dir`, created on first delivery.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_partial(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }
}

impl ArtifactSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<DeliveredArtifact> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(Error::InvalidInput(format!(
                "artifact file name must be a bare name: '{file_name}'"
            )));
        }

        fs::create_dir_all(&self.dir).map_err(|e| Error::OperationFailed {
            operation: "create_export_dir".to_string(),
            cause: format!("{}: {e}", self.dir.display()),
        })?;

        let target = self.dir.join(file_name);
        let partial = self.dir.join(format!(".{file_name}.partial"));

        let written = Self::write_partial(&partial, bytes).and_then(|()| fs::rename(&partial, &target));
        if let Err(e) = written {
            let _ = fs::remove_file(&partial);
            return Err(Error::OperationFailed {
                operation: "write_export_file".to_string(),
                cause: format!("{}: {e}", target.display()),
            });
        }

        tracing::debug!(path = %target.display(), bytes = bytes.len(), "Artifact written");

        Ok(DeliveredArtifact {
            file_name: file_name.to_string(),
            location: Some(target),
            bytes: bytes.len(),
        })
    }
}

/// Keeps delivered artifacts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    delivered: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every delivery as `(file_name, bytes)`, oldest first.
    #[must_use]
    pub fn delivered(&self) -> &[(String, Vec<u8>)] {
        &self.delivered
    }

    /// Returns the most recent delivery.
    #[must_use]
    pub fn last(&self) -> Option<&(String, Vec<u8>)> {
        self.delivered.last()
    }
}

impl ArtifactSink for MemorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<DeliveredArtifact> {
        self.delivered.push((file_name.to_string(), bytes.to_vec()));
        Ok(DeliveredArtifact {
            file_name: file_name.to_string(),
            location: None,
            bytes: bytes.len(),
        })
    }
}
