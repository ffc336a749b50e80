//! Greedy record packing.
//!
//! Each file is serialized as `FILE: <path>\n<content>\n\n` and appended
//! to an accumulator until the next record would push it past the limit.
//! Sizes are counted in `char`s, so slices never split a UTF-8 sequence.

use crate::chunking::DEFAULT_CHUNK_SIZE;
use crate::core::SourceFile;
use crate::error::{ChunkingError, Result};

/// Packs serialized records into chunks of at most `max_size` characters.
///
/// Oversized records are emitted as their own run of slices and leave the
/// accumulator untouched, so a small file after an oversized one keeps
/// filling whatever was pending before it.
///
/// # Errors
///
/// Returns [`ChunkingError::InvalidConfig`] if `max_size` is zero.
///
/// # Examples
///
/// ```
/// use aireadme::chunking::chunk;
/// use aireadme::core::SourceFile;
///
/// let files = vec![SourceFile::new("/a.js", "x")];
/// let chunks = chunk(&files, 3000).unwrap();
/// assert_eq!(chunks, vec!["FILE: /a.js\nx\n\n".to_string()]);
/// ```
pub fn chunk(files: &[SourceFile], max_size: usize) -> Result<Vec<String>> {
    validate(max_size)?;

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for file in files {
        let text = file.serialize();
        let text_len = text.chars().count();

        if text_len > max_size {
            tracing::debug!(
                path = %file.relative_path,
                len = text_len,
                max_size,
                "splitting oversized record"
            );
            chunks.extend(split_chars(&text, max_size));
            continue;
        }

        if current_len + text_len > max_size {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        current.push_str(&text);
        current_len += text_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    Ok(chunks)
}

fn validate(max_size: usize) -> Result<()> {
    if max_size == 0 {
        return Err(ChunkingError::InvalidConfig {
            reason: "max_size must be > 0".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Cuts `text` into contiguous slices of `size` chars; the last may be shorter.
fn split_chars(text: &str, size: usize) -> Vec<String> {
    let mut slices = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == size {
            slices.push(text[start..idx].to_string());
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        slices.push(text[start..].to_string());
    }

    slices
}

/// Configured packing chunker.
///
/// Thin wrapper over [`chunk`] that carries the size limit.
///
/// # Examples
///
/// ```
/// use aireadme::chunking::PackingChunker;
/// use aireadme::core::SourceFile;
///
/// // Each record is 12 chars: "FILE: /a\n1\n\n".
/// let chunker = PackingChunker::with_size(24);
/// let files = vec![SourceFile::new("/a", "1"), SourceFile::new("/b", "2")];
/// let chunks = chunker.chunk(&files).unwrap();
/// assert_eq!(chunks.len(), 1);
/// assert_eq!(chunker.plan(&files).unwrap(), vec![24]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackingChunker {
    max_size: usize,
}

impl Default for PackingChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl PackingChunker {
    /// Creates a chunker with [`DEFAULT_CHUNK_SIZE`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Creates a chunker with a custom size limit.
    #[must_use]
    pub const fn with_size(max_size: usize) -> Self {
        Self { max_size }
    }

    /// Returns the size limit in characters.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns the name of the chunking strategy.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        "packing"
    }

    /// Chunks `files` in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the size limit is invalid.
    pub fn chunk(&self, files: &[SourceFile]) -> Result<Vec<String>> {
        chunk(files, self.max_size)
    }

    /// Length of each chunk in characters, for reporting without a run.
    ///
    /// # Errors
    ///
    /// Returns an error if the size limit is invalid.
    pub fn plan(&self, files: &[SourceFile]) -> Result<Vec<usize>> {
        Ok(self
            .chunk(files)?
            .iter()
            .map(|c| c.chars().count())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn record_of_len(path: &str, len: usize) -> SourceFile {
        // "FILE: " + path + "\n" + content + "\n\n"
        let overhead = 6 + path.len() + 3;
        SourceFile::new(path, "x".repeat(len - overhead))
    }

    #[test]
    fn test_empty_fileset() {
        let chunks = chunk(&[], 3000).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_single_small_file() {
        let files = vec![SourceFile::new("/a.js", "x")];
        let chunks = chunk(&files, 3000).unwrap();
        assert_eq!(chunks, vec!["FILE: /a.js\nx\n\n".to_string()]);
    }

    #[test]
    fn test_oversized_record_slices() {
        let files = vec![record_of_len("/big.txt", 7000)];
        assert_eq!(files[0].serialize().len(), 7000);

        let chunks = chunk(&files, 3000).unwrap();
        let lens: Vec<usize> = chunks.iter().map(String::len).collect();
        assert_eq!(lens, vec![3000, 3000, 1000]);
        assert_eq!(chunks.concat(), files[0].serialize());
    }

    #[test]
    fn test_exact_size_record_is_not_oversized() {
        let files = vec![record_of_len("/a", 12), SourceFile::new("/b", "")];
        let chunks = chunk(&files, 12).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], files[0].serialize());
        assert_eq!(chunks[1], files[1].serialize());
    }

    #[test]
    fn test_records_pack_until_full() {
        let files = vec![
            record_of_len("/a", 20),
            record_of_len("/b", 20),
            record_of_len("/c", 20),
        ];
        let chunks = chunk(&files, 50).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 40);
        assert_eq!(chunks[1].len(), 20);
        assert!(chunks[1].starts_with("FILE: /c\n"));
    }

    #[test]
    fn test_oversized_record_keeps_pending_accumulator() {
        let files = vec![
            record_of_len("/a", 20),
            record_of_len("/big", 60),
            record_of_len("/b", 20),
        ];
        let chunks = chunk(&files, 50).unwrap();

        // Slices of /big come out first; /a and /b share the accumulator.
        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].starts_with("FILE: /big\n"));
        assert_eq!(chunks[0].len(), 50);
        assert_eq!(chunks[1].len(), 10);
        assert_eq!(chunks[2], format!("{}{}", files[0].serialize(), files[2].serialize()));
    }

    #[test]
    fn test_multibyte_slices_respect_char_boundaries() {
        let files = vec![SourceFile::new("/u", "世界".repeat(10))];
        let chunks = chunk(&files, 7).unwrap();
        for c in &chunks {
            assert!(c.chars().count() <= 7);
        }
        assert_eq!(chunks.concat(), files[0].serialize());
    }

    #[test]
    fn test_zero_size_rejected() {
        let files = vec![SourceFile::new("/a", "x")];
        assert!(chunk(&files, 0).is_err());
    }

    #[test_case(300_000 ; "large")]
    #[test_case(usize::MAX ; "unbounded")]
    fn test_large_size_is_accepted(max_size: usize) {
        let files = vec![SourceFile::new("/a", "x"), SourceFile::new("/b", "y")];
        let chunks = chunk(&files, max_size).unwrap();
        assert_eq!(chunks, vec!["FILE: /a\nx\n\nFILE: /b\ny\n\n".to_string()]);
    }

    #[test]
    fn test_split_chars_exact_multiple() {
        let slices = split_chars("abcdef", 3);
        assert_eq!(slices, vec!["abc".to_string(), "def".to_string()]);
    }

    #[test]
    fn test_packing_chunker_defaults() {
        let chunker = PackingChunker::new();
        assert_eq!(chunker.max_size(), DEFAULT_CHUNK_SIZE);
        assert_eq!(chunker.name(), "packing");
        assert_eq!(PackingChunker::with_size(10).max_size(), 10);
    }

    #[test]
    fn test_plan_reports_char_lengths() {
        let files = vec![
            record_of_len("/a", 20),
            SourceFile::new("/u", "世界世界"),
        ];
        let plan = PackingChunker::with_size(50).plan(&files).unwrap();
        assert_eq!(plan, vec![20 + 15]);
        assert!(PackingChunker::with_size(0).plan(&files).is_err());
    }
}
