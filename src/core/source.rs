//! Source file records.

use serde::{Deserialize, Serialize};

/// A text file from the project being documented.
///
/// Records are produced by the walker and are read-only to the chunker.
///
/// # Examples
///
/// ```
/// use aireadme::core::SourceFile;
///
/// let file = SourceFile::new("/a.js", "x");
/// assert_eq!(file.serialize(), "FILE: /a.js\nx\n\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path relative to the project root, with a leading `/`.
    pub relative_path: String,

    /// Decoded UTF-8 content.
    pub content: String,
}

impl SourceFile {
    /// Creates a new source record.
    #[must_use]
    pub fn new(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }

    /// Serializes the record as it appears inside a chunk.
    #[must_use]
    pub fn serialize(&self) -> String {
        format!("FILE: {}\n{}\n\n", self.relative_path, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_record() {
        let file = SourceFile::new("/src/main.rs", "fn main() {}");
        assert_eq!(file.serialize(), "FILE: /src/main.rs\nfn main() {}\n\n");
    }

    #[test]
    fn test_serialize_empty_content() {
        let file = SourceFile::new("/empty.txt", "");
        assert_eq!(file.serialize(), "FILE: /empty.txt\n\n\n");
    }
}
