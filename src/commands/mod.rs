//! Command handlers module.
//!
//! - `io.rs`: export and import commands
//! - `config.rs`: configuration display command

mod config;
mod io;

pub use config::cmd_config;
pub use io::{cmd_export, cmd_import};

/// Failure that the notifier has already shown to the user.
///
/// `main` exits non-zero for it without printing a second message.
#[derive(Debug)]
pub struct AlreadyReported;

impl std::fmt::Display for AlreadyReported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("operation failed")
    }
}

impl std::error::Error for AlreadyReported {}
