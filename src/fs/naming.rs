//! Filename generation and sanitization.

use crate::error::{Error, Result};
use crate::extract::Metadata;

/// Characters replaced with `_` in filenames.
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Validate and sanitize a filename.
///
/// Returns an error for path traversal patterns, path separators, NUL bytes
/// and empty names; other problematic characters are replaced.
pub fn sanitize_filename(name: &str) -> Result<String> {
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }
    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }
    if name.trim().is_empty() {
        return Err(Error::InvalidFilename("Empty filename".to_string()));
    }

    Ok(name.replace(INVALID_CHARS, "_"))
}

/// Sanitize one directory component; separators are replaced rather than
/// rejected.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }
    sanitize_filename(&name.replace(['/', '\\'], "_"))
}

/// Build the output filename for a file event: `<tweet_id>_<num>.<ext>`,
/// with the extension segment dropped when empty.
pub fn event_filename(metadata: &Metadata) -> Result<String> {
    let tweet_id = metadata
        .get("tweet_id")
        .map(|v| v.to_string())
        .unwrap_or_else(|| "0".to_string());
    let num = metadata.get("num").map(|v| v.to_string()).unwrap_or_else(|| "1".to_string());
    let extension = metadata
        .get("extension")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    let name = if extension.is_empty() {
        format!("{}_{}", tweet_id, num)
    } else {
        format!("{}_{}.{}", tweet_id, num, extension)
    };
    sanitize_filename(&name)
}
