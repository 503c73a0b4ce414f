//! Application ports (traits) for external dependencies.
//!
//! The engine needs exactly one thing from the outside world: "parse the
//! document at this path into a node tree". `templar-adapters` implements
//! this port for the real filesystem and for in-memory test fixtures.

use std::path::Path;

use crate::domain::Node;
use crate::error::TemplarResult;

/// Port for document loading.
///
/// Implemented by:
/// - `templar_adapters::FsDocumentLoader` (production)
/// - `templar_adapters::MemoryDocumentLoader` (testing)
///
/// Implementations own the source preprocessing (placeholder markers and the
/// raw-RPN character fix-ups) so that the engine only ever sees marker-form
/// trees.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentLoader: Send + Sync {
    /// Parse the document at `path` into its root node.
    fn load(&self, path: &Path) -> TemplarResult<Node>;
}
