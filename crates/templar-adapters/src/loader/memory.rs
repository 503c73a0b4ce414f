//! In-memory document loader for testing.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use templar_core::application::{ApplicationError, ports::DocumentLoader};
use templar_core::domain::Node;
use templar_core::error::{TemplarError, TemplarResult};

use crate::xml;

/// In-memory path → source map for tests: include and dedup scenarios run
/// without touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentLoader {
    inner: Arc<RwLock<HashMap<PathBuf, String>>>,
}

impl MemoryDocumentLoader {
    /// Create a new empty memory loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document source under a path.
    pub fn insert(&self, path: impl Into<PathBuf>, source: impl Into<String>) {
        self.inner
            .write()
            .expect("memory loader lock poisoned")
            .insert(path.into(), source.into());
    }

    /// Builder-style [`Self::insert`].
    pub fn with_document(self, path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    /// Paths registered so far (testing helper).
    pub fn paths(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .expect("memory loader lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

impl DocumentLoader for MemoryDocumentLoader {
    fn load(&self, path: &Path) -> TemplarResult<Node> {
        let map = self.inner.read().map_err(|_| TemplarError::Internal {
            message: "memory loader lock poisoned".into(),
        })?;
        let source = map.get(path).ok_or_else(|| ApplicationError::DocumentNotFound {
            path: path.to_path_buf(),
        })?;
        xml::parse_document(source).map_err(|e| {
            ApplicationError::DocumentLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
