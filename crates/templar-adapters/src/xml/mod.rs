//! XML syntax handling: reading source text into the tree model and writing
//! finished trees back out.

pub mod reader;
pub mod writer;

pub use reader::{ParseError, parse_document, parse_str, prepare_source};
pub use writer::write_document;
