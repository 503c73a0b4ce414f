//! The expansion session: registries and options with an explicit lifetime
//! of one top-level invocation.
//!
//! The original design kept template definitions and the included-path set in
//! process-wide tables. Here they are owned by `ExpansionSession`, created
//! per `expand_document` call — write-once-per-key, never revised, never
//! shared across sessions.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ports::DocumentLoader;
use crate::domain::{DomainError, Node, ParamEnv};
use crate::error::TemplarResult;
use crate::expand::walker;

/// How an invocation of an undefined template is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStrictness {
    /// Undefined template names are fatal reference errors.
    #[default]
    Strict,
    /// Undefined template calls are consumed as silent no-ops.
    Lenient,
}

/// Knobs for one expansion run.
#[derive(Debug, Clone)]
pub struct ExpandOptions {
    /// Base directory for absolute-mode includes (`ModelBehaviorFile`/`Path`).
    pub include_dir: PathBuf,
    /// Undefined-template policy.
    pub strictness: TemplateStrictness,
}

impl ExpandOptions {
    pub fn new(include_dir: impl Into<PathBuf>) -> Self {
        Self {
            include_dir: include_dir.into(),
            strictness: TemplateStrictness::default(),
        }
    }

    pub fn with_strictness(mut self, strictness: TemplateStrictness) -> Self {
        self.strictness = strictness;
        self
    }
}

/// Per-invocation expansion state.
///
/// Holds the template and input-event registries, the included-path set, the
/// options, and a handle to the loader port for resolving includes.
pub struct ExpansionSession<'a> {
    loader: &'a dyn DocumentLoader,
    options: &'a ExpandOptions,
    templates: HashMap<String, Node>,
    input_events: HashMap<String, Node>,
    included: HashSet<String>,
}

impl<'a> ExpansionSession<'a> {
    pub fn new(loader: &'a dyn DocumentLoader, options: &'a ExpandOptions) -> Self {
        Self {
            loader,
            options,
            templates: HashMap::new(),
            input_events: HashMap::new(),
            included: HashSet::new(),
        }
    }

    /// Expand `root`'s subtree in place.
    ///
    /// `file` is the path the document was loaded from; relative includes in
    /// the top-level scope resolve against its directory.
    pub fn expand_document(&mut self, root: &mut Node, file: &Path) -> TemplarResult<()> {
        let mut env = ParamEnv::new();
        walker::expand_children(self, root, &mut env, file, false)
    }

    // ── registries ────────────────────────────────────────────────────────

    /// Register a template definition. First definition wins the name;
    /// a second definition of the same name is fatal.
    pub(crate) fn define_template(&mut self, name: String, body: Node) -> Result<(), DomainError> {
        if self.templates.contains_key(&name) {
            return Err(DomainError::DuplicateTemplate { name });
        }
        debug!(template = %name, "defined template");
        self.templates.insert(name, body);
        Ok(())
    }

    pub(crate) fn template(&self, name: &str) -> Option<&Node> {
        self.templates.get(name)
    }

    pub(crate) fn define_input_event(&mut self, id: String, body: Node) -> Result<(), DomainError> {
        if self.input_events.contains_key(&id) {
            return Err(DomainError::DuplicateInputEvent { id });
        }
        debug!(input_event = %id, "defined input event");
        self.input_events.insert(id, body);
        Ok(())
    }

    /// Record an include by canonical key. Returns `false` when the key was
    /// already present (the include must then be a no-op).
    pub(crate) fn mark_included(&mut self, key: String) -> bool {
        self.included.insert(key)
    }

    pub(crate) fn is_included(&self, key: &str) -> bool {
        self.included.contains(key)
    }

    // ── collaborators ─────────────────────────────────────────────────────

    pub(crate) fn load_document(&self, path: &Path) -> TemplarResult<Node> {
        self.loader.load(path)
    }

    pub(crate) fn include_dir(&self) -> &Path {
        &self.options.include_dir
    }

    pub(crate) fn strictness(&self) -> TemplateStrictness {
        self.options.strictness
    }

    // ── introspection (service logging, tests) ────────────────────────────

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    pub fn input_event_count(&self) -> usize {
        self.input_events.len()
    }

    pub fn included_count(&self) -> usize {
        self.included.len()
    }
}
