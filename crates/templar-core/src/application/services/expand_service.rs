//! Expand Service - main application orchestrator.
//!
//! One service call is one expansion session: load the root document through
//! the injected loader, walk it to a fully expanded tree, hand the tree back.
//! Serialization is the caller's concern.

use std::path::Path;

use tracing::{info, instrument};

use crate::application::ports::DocumentLoader;
use crate::domain::Node;
use crate::error::TemplarResult;
use crate::expand::{ExpandOptions, ExpansionSession};

/// Main expansion service.
///
/// Owns the loader port and the options; registries live per call in an
/// [`ExpansionSession`], so a service instance can expand several documents
/// without state bleeding between them.
pub struct ExpandService {
    loader: Box<dyn DocumentLoader>,
    options: ExpandOptions,
}

impl ExpandService {
    /// Create a new expand service with the given loader adapter.
    pub fn new(loader: Box<dyn DocumentLoader>, options: ExpandOptions) -> Self {
        Self { loader, options }
    }

    /// Expand the document at `input` and return the finished tree.
    ///
    /// This is the main use case — every macro construct in the document (and
    /// anything it includes) is resolved; the returned tree contains none of
    /// the macro vocabulary.
    #[instrument(skip_all, fields(input = %input.as_ref().display()))]
    pub fn expand_file(&self, input: impl AsRef<Path>) -> TemplarResult<Node> {
        let input = input.as_ref();
        info!("Expanding document");

        let mut root = self.loader.load(input)?;

        let mut session = ExpansionSession::new(self.loader.as_ref(), &self.options);
        session.expand_document(&mut root, input)?;

        info!(
            templates = session.template_count(),
            input_events = session.input_event_count(),
            includes = session.included_count(),
            "Expansion complete"
        );
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockDocumentLoader;
    use crate::domain::{DomainError, Node};
    use crate::error::TemplarError;
    use crate::expand::TemplateStrictness;

    fn service_with(root: Node) -> ExpandService {
        let mut loader = MockDocumentLoader::new();
        loader.expect_load().return_once(move |_| Ok(root));
        ExpandService::new(Box::new(loader), ExpandOptions::new("/base"))
    }

    #[test]
    fn expands_constructs_in_loaded_document() {
        let root = Node::new("Root").with_child(
            Node::new("Condition")
                .with_attr("Check", "NEVER_BOUND")
                .with_child(Node::new("Gone")),
        );
        let tree = service_with(root).expand_file("input.xml").unwrap();
        assert!(tree.children.is_empty());
    }

    #[test]
    fn undefined_template_is_fatal_by_default() {
        let root = Node::new("Root")
            .with_child(Node::new("UseTemplate").with_attr("Name", "Ghost"));
        let err = service_with(root).expand_file("input.xml").unwrap_err();
        assert!(matches!(
            err,
            TemplarError::Domain(DomainError::UndefinedTemplate { .. })
        ));
    }

    #[test]
    fn lenient_mode_drops_undefined_template_calls() {
        let root = Node::new("Root")
            .with_child(Node::new("UseTemplate").with_attr("Name", "Ghost"));
        let mut loader = MockDocumentLoader::new();
        loader.expect_load().return_once(move |_| Ok(root));
        let service = ExpandService::new(
            Box::new(loader),
            ExpandOptions::new("/base").with_strictness(TemplateStrictness::Lenient),
        );
        let tree = service.expand_file("input.xml").unwrap();
        assert!(tree.children.is_empty());
    }

    #[test]
    fn loader_failure_propagates() {
        let mut loader = MockDocumentLoader::new();
        loader.expect_load().return_once(|path| {
            Err(crate::application::ApplicationError::DocumentNotFound {
                path: path.to_path_buf(),
            }
            .into())
        });
        let service = ExpandService::new(Box::new(loader), ExpandOptions::new("/base"));
        assert!(service.expand_file("missing.xml").is_err());
    }
}
