//! Output sink for the generated document.

use std::path::Path;

use crate::error::{IoError, Result};

/// File name written inside the project directory.
pub const DEFAULT_OUTPUT_FILE: &str = "README.md";

/// Writes `content` to `path`, creating parent directories if needed.
///
/// # Errors
///
/// Returns an error if directory creation or file writing fails.
///
/// # Examples
///
/// ```no_run
/// use aireadme::io::write_document;
///
/// write_document("README.md", "# Project\n").unwrap();
/// ```
pub fn write_document<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path_ref = path.as_ref();
    let path_str = path_ref.to_string_lossy().to_string();

    if let Some(parent) = path_ref.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| IoError::DirectoryFailed {
            path: parent.to_string_lossy().to_string(),
            reason: e.to_string(),
        })?;
    }

    std::fs::write(path_ref, content).map_err(|e| IoError::WriteFailed {
        path: path_str,
        reason: e.to_string(),
    })?;

    tracing::debug!(path = %path_ref.display(), bytes = content.len(), "document written");
    Ok(())
}
