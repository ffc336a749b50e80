//! Core domain models for aireadme.
//!
//! Pure data with no I/O: the source records fed to the chunker and the
//! conversation messages sent to the completion service.

pub mod message;
pub mod source;

pub use message::{Message, Role};
pub use source::SourceFile;
