//! Filesystem edges of the pipeline.
//!
//! [`walker`] collects the project's text files; [`sink`] writes the
//! generated document.

pub mod sink;
pub mod walker;

pub use sink::{DEFAULT_OUTPUT_FILE, write_document};
pub use walker::{WalkOptions, read_project_files};
