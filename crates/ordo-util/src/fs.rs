use std::path::{Path, PathBuf};

use crate::errors::OrdoError;

/// Walk up from `start` looking for a file named `filename`.
/// Returns the full path of the first match, or `None`.
pub fn find_file_upwards(start: &Path, filename: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.is_file())
}

/// Read a UTF-8 text file, naming `what` it is in the error message.
pub fn read_text(path: &Path, what: &str) -> Result<String, OrdoError> {
    std::fs::read_to_string(path).map_err(|e| OrdoError::Generic {
        message: format!("Failed to read {what} {}: {e}", path.display()),
    })
}
