//! JSON codec for artifacts.
//!
//! Artifacts are written pretty-printed (two-space indentation) so they can
//! be inspected and edited by hand.

use super::artifact::{Artifact, ParsedArtifact};
use crate::{Error, Result};

/// Serializes an artifact to indented JSON with a trailing newline.
///
/// # Errors
///
/// Returns an error if a template value cannot be serialized.
pub fn encode_artifact(artifact: &Artifact) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(artifact).map_err(|e| Error::OperationFailed {
        operation: "encode_artifact".to_string(),
        cause: e.to_string(),
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Parses artifact text.
///
/// A single leading byte-order mark is ignored.
///
/// The whole document is parsed before anything is returned, so a bad entry
/// anywhere in `templates` rejects the file as a unit.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the text is not JSON, the root is not
/// an object, `templates` is missing or not an array, or any template entry
/// is not a JSON object.
pub fn decode_artifact(text: &str) -> Result<ParsedArtifact> {
    // Files saved by some editors start with a UTF-8 byte-order mark.
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    // Structs also deserialize from JSON arrays; only objects are artifacts.
    if !text.trim_start().starts_with('{') {
        return Err(Error::InvalidInput(
            "malformed artifact: root is not a JSON object".to_string(),
        ));
    }
    serde_json::from_str(text).map_err(|e| Error::InvalidInput(format!("malformed artifact: {e}")))
}
