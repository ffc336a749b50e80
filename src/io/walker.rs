//! Project file discovery.
//!
//! Walks a project directory and returns its text files in a stable
//! order. A path is skipped when its root-relative form *contains* any
//! ignored fragment, so `.git` also excludes `.github/` and `dist`
//! excludes `distance.rs`.

use std::path::Path;

use ignore::WalkBuilder;

use crate::core::SourceFile;
use crate::error::{IoError, Result};

/// Path fragments that exclude a file or directory.
pub const IGNORED_PATHS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    ".next",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    ".env",
    ".env.local",
    ".env.production",
    ".DS_Store",
    "README.md",
    "LICENSE",
];

/// File name suffixes that exclude a file.
pub const IGNORED_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".svg", ".gif", ".lock", ".log", ".zip", ".pdf",
];

/// Largest file read, in bytes (200 KiB).
pub const MAX_FILE_SIZE: u64 = 200 * 1024;

/// Filtering rules for [`read_project_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Path fragments that exclude an entry.
    pub ignored_paths: Vec<String>,
    /// File name suffixes that exclude a file.
    pub ignored_extensions: Vec<String>,
    /// Files larger than this are skipped.
    pub max_file_size: u64,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            ignored_paths: IGNORED_PATHS.iter().map(ToString::to_string).collect(),
            ignored_extensions: IGNORED_EXTENSIONS.iter().map(ToString::to_string).collect(),
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl WalkOptions {
    /// Whether the root-relative `path` contains an ignored fragment.
    #[must_use]
    pub fn is_ignored_path(&self, path: &str) -> bool {
        self.ignored_paths.iter().any(|p| path.contains(p.as_str()))
    }

    /// Whether `file_name` ends with an ignored suffix.
    #[must_use]
    pub fn has_ignored_extension(&self, file_name: &str) -> bool {
        self.ignored_extensions
            .iter()
            .any(|ext| file_name.ends_with(ext.as_str()))
    }
}

/// Root-relative path with a leading `/` and `/` separators.
fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut out = String::new();
    for component in rel.components() {
        out.push('/');
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}

/// Reads every eligible text file under `root`, sorted by path.
///
/// Files that are not valid UTF-8 are skipped.
///
/// # Errors
///
/// Returns an error if `root` is not a directory or an entry cannot be read.
pub fn read_project_files(root: &Path, options: &WalkOptions) -> Result<Vec<SourceFile>> {
    if !root.is_dir() {
        return Err(IoError::FileNotFound {
            path: root.to_string_lossy().to_string(),
        }
        .into());
    }

    let filter_root = root.to_path_buf();
    let filter_options = options.clone();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            entry.depth() == 0
                || !filter_options.is_ignored_path(&relative_path(&filter_root, entry.path()))
        })
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = result.map_err(|e| IoError::ReadFailed {
            path: root.to_string_lossy().to_string(),
            reason: e.to_string(),
        })?;

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy();
        if options.has_ignored_extension(&file_name) {
            continue;
        }

        let path_str = path.to_string_lossy().to_string();
        let size = entry
            .metadata()
            .map_err(|e| IoError::ReadFailed {
                path: path_str.clone(),
                reason: e.to_string(),
            })?
            .len();
        if size > options.max_file_size {
            tracing::debug!(path = %path_str, size, "skipping large file");
            continue;
        }

        let bytes = std::fs::read(path).map_err(|e| IoError::ReadFailed {
            path: path_str.clone(),
            reason: e.to_string(),
        })?;
        let Ok(content) = String::from_utf8(bytes) else {
            tracing::debug!(path = %path_str, "skipping non UTF-8 file");
            continue;
        };

        files.push(SourceFile::new(relative_path(root, path), content));
    }

    tracing::info!(root = %root.display(), files = files.len(), "project files read");
    Ok(files)
}
