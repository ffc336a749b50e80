//! Chunking for aireadme.
//!
//! Repacks an ordered set of source files into size-bounded text chunks,
//! one chunk per summarization call. Records are kept whole unless a
//! single record is larger than the chunk size, in which case that record
//! alone is cut into fixed-size slices.

pub mod packing;

pub use packing::{PackingChunker, chunk};

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 3000;
