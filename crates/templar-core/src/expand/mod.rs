//! The expansion engine: session state, the tree walker, and the
//! splice-in-place rewriters for each control construct.

pub mod session;

mod condition;
mod include;
mod loops;
mod switch;
mod use_template;
pub(crate) mod walker;

pub use loops::UNBOUNDED_LOOP_CAP;
pub use session::{ExpandOptions, ExpansionSession, TemplateStrictness};
