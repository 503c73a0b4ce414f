//! Filesystem document loader using std::fs.

use std::io;
use std::path::Path;

use tracing::debug;

use templar_core::application::{ApplicationError, ports::DocumentLoader};
use templar_core::domain::Node;
use templar_core::error::TemplarResult;

use crate::xml;

/// Production loader: reads UTF-8 files from disk, preprocesses, parses.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentLoader;

impl FsDocumentLoader {
    /// Create a new filesystem loader.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for FsDocumentLoader {
    fn load(&self, path: &Path) -> TemplarResult<Node> {
        debug!(path = %path.display(), "loading document");
        let source = std::fs::read_to_string(path).map_err(|e| map_io_error(path, e))?;
        xml::parse_document(&source).map_err(|e| {
            ApplicationError::DocumentLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

fn map_io_error(path: &Path, e: io::Error) -> templar_core::error::TemplarError {
    match e.kind() {
        io::ErrorKind::NotFound => ApplicationError::DocumentNotFound {
            path: path.to_path_buf(),
        }
        .into(),
        _ => ApplicationError::DocumentLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into(),
    }
}
