//! Domain layer: the tree model, parameter scoping, and placeholder
//! substitution. Pure logic — no I/O, no XML syntax, no expansion control
//! flow (that lives in [`crate::expand`]).

pub mod env;
pub mod error;
pub mod node;
pub mod placeholder;

pub use env::ParamEnv;
pub use error::{DomainError, ErrorCategory};
pub use node::Node;
pub use placeholder::{
    encode_placeholders, expand_node_strings, expand_opt, expand_string, marker_for, marker_name,
};
