//! The markup tree model.
//!
//! # Design
//!
//! `Node` mirrors the shape of the source markup one-to-one: a tag, an
//! insertion-ordered attribute map, optional `text` (content before the first
//! child), optional `tail` (content after the element's end tag, which belongs
//! to the *parent's* text stream), and an ordered child vector.
//!
//! Ownership is strict: a node is owned by exactly one parent's child vector,
//! except transiently while an expander splices it. Template instantiation
//! always deep-copies, so a registered definition is never aliased by the
//! output tree.

use indexmap::IndexMap;

/// Maximum content length shown by [`Node::summary`] before truncation.
const SUMMARY_TEXT_LIMIT: usize = 48;

/// An element in the markup tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    /// Element tag name.
    pub tag: String,
    /// Attributes in document order. Keys are unique.
    pub attributes: IndexMap<String, String>,
    /// Text between the start tag and the first child.
    pub text: Option<String>,
    /// Text between this element's end tag and the next sibling.
    pub tail: Option<String>,
    /// Child elements in document order.
    pub children: Vec<Node>,
}

impl Node {
    /// Create an empty element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter, mainly for adapters and tests.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder-style text setter.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder-style child appender.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Look up an attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Iterate over children with the given tag.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Node> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// First child with the given tag, if any.
    pub fn child_named(&self, tag: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Number of children with the given tag.
    pub fn count_named(&self, tag: &str) -> usize {
        self.children_named(tag).count()
    }

    /// Copy of this element without its children.
    ///
    /// The counterpart of a reference-semantics shallow copy: attributes,
    /// text, and tail are duplicated, the child vector starts empty so the
    /// caller decides which subtrees move in.
    pub fn shallow_copy(&self) -> Node {
        Node {
            tag: self.tag.clone(),
            attributes: self.attributes.clone(),
            text: self.text.clone(),
            tail: self.tail.clone(),
            children: Vec::new(),
        }
    }

    /// Fully independent copy of this subtree.
    pub fn deep_copy(&self) -> Node {
        self.clone()
    }

    /// Drop all children.
    pub fn clear_children(&mut self) {
        self.children.clear();
        debug_assert!(self.children.is_empty());
    }

    /// Drop all attributes.
    pub fn clear_attributes(&mut self) {
        self.attributes.clear();
    }

    /// Compact one-line rendering for diagnostics and log events.
    ///
    /// Children are elided to `...`, text is whitespace-compressed and
    /// truncated. Never used for output serialization.
    pub fn summary(&self) -> String {
        let mut out = String::from("<");
        out.push_str(&self.tag);
        for (key, value) in &self.attributes {
            out.push_str(&format!(" {key}=\"{value}\""));
        }
        if self.text.is_none() && self.children.is_empty() {
            out.push_str("/>");
            return out;
        }
        out.push('>');
        if let Some(text) = &self.text {
            let compressed = compress_whitespace(text);
            if compressed.chars().count() > SUMMARY_TEXT_LIMIT {
                out.extend(compressed.chars().take(SUMMARY_TEXT_LIMIT));
                out.push('…');
            } else {
                out.push_str(&compressed);
            }
        }
        if !self.children.is_empty() {
            out.push_str("...");
        }
        out.push_str(&format!("</{}>", self.tag));
        out
    }
}

fn compress_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_ws = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_ws {
                out.push(' ');
            }
            in_ws = true;
        } else {
            out.push(c);
            in_ws = false;
        }
    }
    out
}
