//! Infrastructure adapters for Templar.
//!
//! This crate implements the port defined in `templar_core::application::ports`
//! and owns everything XML-syntax-shaped: reading source text (with its
//! placeholder and raw-RPN preprocessing) into the core tree model, and
//! serializing finished trees back to text.

pub mod loader;
pub mod xml;

// Re-export commonly used adapters
pub use loader::{FsDocumentLoader, MemoryDocumentLoader};
pub use xml::{parse_document, write_document};
