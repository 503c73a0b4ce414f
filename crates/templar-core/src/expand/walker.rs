//! The tree walker: recursive traversal driving all expanders.
//!
//! A node's children are processed under an explicit, mutable index because
//! expanders insert and remove a variable number of siblings at the current
//! position. After any splice the walk resumes at the first spliced-in
//! element — never past it — so nested macro constructs introduced by a
//! splice are expanded in the same pass.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::domain::{Node, ParamEnv, expand_opt, expand_string};
use crate::error::TemplarResult;
use crate::expand::session::ExpansionSession;
use crate::expand::{condition, include, loops, switch, use_template};

/// Tags that route to the template parameter-list expander when the walk is
/// inside a template body.
const PARAMETER_LIST_TAGS: [&str; 4] = [
    "Parameters",
    "DefaultTemplateParameters",
    "OverrideTemplateParameters",
    "EditableTemplateParameters",
];

/// Expand all children of `node` in place.
///
/// `env` accumulates within this sibling scope: parameter lists bind into it
/// and later siblings observe the bindings. Recursion into ordinary children
/// always passes a value copy.
///
/// `file` is the document the walk started in; `FILE`/`EOF` markers spliced
/// by includes adjust a local stack on top of it, so relative includes always
/// resolve against the file that physically contains them.
pub(crate) fn expand_children(
    session: &mut ExpansionSession<'_>,
    node: &mut Node,
    env: &mut ParamEnv,
    file: &Path,
    in_template: bool,
) -> TemplarResult<()> {
    let mut file_stack: Vec<PathBuf> = vec![file.to_path_buf()];
    let mut ix = 0;

    while ix < node.children.len() {
        let tag = node.children[ix].tag.clone();
        trace!(ix, %tag, "walking sibling");
        match tag.as_str() {
            // File markers are walker bookkeeping: they maintain the current
            // file for relative includes and never reach the output.
            "FILE" => {
                let path = node.children[ix].attr("Path").unwrap_or_default().to_string();
                file_stack.push(PathBuf::from(path));
                node.children.remove(ix);
            }
            "EOF" => {
                file_stack.pop();
                node.children.remove(ix);
            }
            "Include" => {
                include::expand_include(session, &mut node.children, ix, &file_stack, env)?;
            }
            "Template" => {
                include::capture_template(session, &mut node.children, ix, env)?;
            }
            "InputEvent" => {
                include::capture_input_event(session, &mut node.children, ix, env)?;
            }
            "Condition" => {
                condition::expand_condition(&mut node.children, ix, env)?;
            }
            "Switch" => {
                switch::expand_switch(&mut node.children, ix, env)?;
            }
            "Loop" => {
                loops::expand_loop(&mut node.children, ix, env)?;
            }
            "UseTemplate" => {
                let current = current_file(&file_stack);
                use_template::expand_use_template(session, &mut node.children, ix, env, &current)?;
            }
            t if in_template && PARAMETER_LIST_TAGS.contains(&t) => {
                let current = current_file(&file_stack);
                use_template::expand_parameter_list(
                    session,
                    &mut node.children,
                    ix,
                    env,
                    &current,
                )?;
            }
            _ => {
                // Ordinary element: recurse with a scoped environment, then
                // substitute its own strings in this scope's environment.
                let current = current_file(&file_stack);
                let child = &mut node.children[ix];
                let mut child_env = env.scoped();
                expand_children(session, child, &mut child_env, &current, false)?;
                child.text = expand_opt(child.text.as_deref(), env);
                child.tail = expand_opt(child.tail.as_deref(), env);
                for value in child.attributes.values_mut() {
                    *value = expand_string(value, env);
                }
                ix += 1;
            }
        }
    }

    Ok(())
}

fn current_file(file_stack: &[PathBuf]) -> PathBuf {
    file_stack.last().cloned().unwrap_or_default()
}
