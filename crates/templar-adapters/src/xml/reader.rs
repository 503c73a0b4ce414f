//! XML parsing into the core tree model.
//!
//! Two stages, both of which belong on this side of the port boundary:
//!
//! 1. [`prepare_source`] rewrites raw document text so it parses cleanly:
//!    `#NAME#` placeholder references become internal markers, and two
//!    spellings of raw RPN that are not XML-clean get escaped (`> if{` and
//!    bare `&` between spaces — real-world files contain both).
//! 2. [`parse_str`] runs the quick-xml event stream and builds [`Node`]s,
//!    attributing character data the way the tree model expects: content
//!    before the first child is the element's `text`, content after a child's
//!    end tag is that child's `tail`.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use templar_core::domain::{Node, encode_placeholders};

/// Failures turning source text into a tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("XML syntax: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("bad attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("document has no root element")]
    NoRoot,

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("closing tag without a matching open tag")]
    UnbalancedClose,
}

/// Rewrite raw source so it survives XML parsing.
pub fn prepare_source(source: &str) -> String {
    let prepared = encode_placeholders(source);
    // Raw RPN in some files uses > and & as such. Escape the known shapes.
    let prepared = prepared.replace(" > if{", " &gt; if{");
    prepared.replace(" & ", " &amp; ")
}

/// Parse prepared source text into its root node.
pub fn parse_str(source: &str) -> Result<Node, ParseError> {
    let mut reader = Reader::from_str(source);
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(node_from_start(&start)?);
            }
            Event::Empty(start) => {
                let node = node_from_start(&start)?;
                close_element(node, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let node = stack.pop().ok_or(ParseError::UnbalancedClose)?;
                close_element(node, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                attach_text(&mut stack, &text.unescape()?);
            }
            Event::CData(data) => {
                attach_text(&mut stack, &String::from_utf8_lossy(&data.into_inner()));
            }
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    root.ok_or(ParseError::NoRoot)
}

/// [`prepare_source`] + [`parse_str`] in one step, for loaders.
pub fn parse_document(source: &str) -> Result<Node, ParseError> {
    parse_str(&prepare_source(source))
}

fn node_from_start(start: &BytesStart<'_>) -> Result<Node, ParseError> {
    let mut node = Node::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        node.attributes.insert(key, value);
    }
    Ok(node)
}

/// A finished element either becomes a child of the open element above it or
/// the document root.
fn close_element(
    node: Node,
    stack: &mut Vec<Node>,
    root: &mut Option<Node>,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None => {
            if root.replace(node).is_some() {
                return Err(ParseError::MultipleRoots);
            }
            Ok(())
        }
    }
}

/// Character data belongs to the open element's `text` until it has
/// children, then to the last child's `tail`.
fn attach_text(stack: &mut [Node], chunk: &str) {
    let Some(open) = stack.last_mut() else {
        // Whitespace around the root element; the tree has no place for it.
        return;
    };
    let slot = match open.children.last_mut() {
        Some(last_child) => &mut last_child.tail,
        None => &mut open.text,
    };
    match slot {
        Some(existing) => existing.push_str(chunk),
        None => *slot = Some(chunk.to_string()),
    }
}
