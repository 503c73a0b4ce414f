//! Serialization of a finished tree back to XML text.
//!
//! The writer is deliberately literal: attributes in stored order, text and
//! tail content verbatim (whitespace included), `<Tag/>` self-closing form
//! for childless, textless elements. The expansion engine owns the tree's
//! shape; all this does is spell it.

use quick_xml::escape::{escape, partial_escape};

use templar_core::domain::Node;

/// Serialize `root` (and its subtree) to XML text.
///
/// The root's own `tail` is outside the document and is not emitted.
pub fn write_document(root: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, root);
    out
}

fn write_node(out: &mut String, node: &Node) {
    out.push('<');
    out.push_str(&node.tag);
    for (key, value) in &node.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }
    // Empty text renders the same as no text, so an element whose content
    // was substituted away still self-closes.
    let text = node.text.as_deref().filter(|t| !t.is_empty());
    if text.is_none() && node.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    if let Some(text) = text {
        out.push_str(&partial_escape(text));
    }
    for child in &node.children {
        write_node(out, child);
        if let Some(tail) = &child.tail {
            out.push_str(&partial_escape(tail.as_str()));
        }
    }
    out.push_str(&format!("</{}>", node.tag));
}
