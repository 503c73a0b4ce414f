//! Inclusion and definition resolution.
//!
//! `Template` and `InputEvent` definitions are captured into the session
//! registries the first time the walk encounters them and removed from the
//! tree — they only reach the output via explicit invocation. `Include`
//! splices a referenced file's content in place, wrapped in `FILE`/`EOF`
//! markers that keep the walker's file stack honest for nested relative
//! includes; a canonical-path registry makes the second include of any file a
//! pure no-op.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{DomainError, Node, ParamEnv, expand_string};
use crate::error::TemplarResult;
use crate::expand::session::ExpansionSession;

/// Consume the `Include` element at `siblings[ix]`, splicing the target
/// file's children (with file markers) unless the target was already
/// included.
///
/// Addressing, exactly one of:
/// - `ModelBehaviorFile` or `Path` — resolved against the configured base
///   include directory;
/// - `RelativeFile` — resolved against the directory of the file currently
///   being walked (top of `file_stack`).
pub(crate) fn expand_include(
    session: &mut ExpansionSession<'_>,
    siblings: &mut Vec<Node>,
    ix: usize,
    file_stack: &[PathBuf],
    env: &ParamEnv,
) -> TemplarResult<()> {
    let elem = &siblings[ix];
    let base_target = elem.attr("ModelBehaviorFile").or_else(|| elem.attr("Path"));
    let relative_target = elem.attr("RelativeFile");

    let full = match (base_target, relative_target) {
        (Some(_), Some(_)) => {
            return Err(DomainError::structural(
                "Include",
                "both base-directory and RelativeFile addressing present",
            )
            .into());
        }
        (None, None) => {
            return Err(DomainError::structural(
                "Include",
                "no \"ModelBehaviorFile\", \"Path\", or \"RelativeFile\" attribute",
            )
            .into());
        }
        (Some(target), None) => {
            let target = clean_pathname(&expand_string(target, env));
            let base = clean_pathname(&session.include_dir().display().to_string());
            clean_pathname(&format!("{base}/{target}"))
        }
        (None, Some(target)) => {
            let target = clean_pathname(&expand_string(target, env));
            let dir = file_stack
                .last()
                .and_then(|f| f.parent())
                .map(|d| d.display().to_string())
                .unwrap_or_default();
            clean_pathname(&format!("{dir}/{target}"))
        }
    };

    siblings.remove(ix);

    // Dedup key: canonicalized, case-insensitive.
    let key = full.to_lowercase();
    if session.is_included(&key) {
        debug!(path = %full, "file already included, skipping");
        return Ok(());
    }

    let tree = session.load_document(Path::new(&full))?;
    let previous = file_stack
        .last()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    let mut at = ix;
    siblings.insert(at, file_marker(Some(&full)));
    at += 1;
    for child in tree.children {
        siblings.insert(at, child);
        at += 1;
    }
    siblings.insert(at, file_marker(None));
    at += 1;
    siblings.insert(at, file_marker(Some(&previous)));

    session.mark_included(key);
    debug!(path = %full, "included file");
    Ok(())
}

/// Capture a `Template` definition into the session registry and remove it
/// from the tree.
pub(crate) fn capture_template(
    session: &mut ExpansionSession<'_>,
    siblings: &mut Vec<Node>,
    ix: usize,
    env: &ParamEnv,
) -> TemplarResult<()> {
    let name = siblings[ix]
        .attr("Name")
        .ok_or_else(|| DomainError::structural("Template", "no Name attribute"))?;
    let name = expand_string(name, env);
    let body = siblings.remove(ix);
    session.define_template(name, body)?;
    Ok(())
}

/// Capture an `InputEvent` definition, keyed by `ID`.
pub(crate) fn capture_input_event(
    session: &mut ExpansionSession<'_>,
    siblings: &mut Vec<Node>,
    ix: usize,
    env: &ParamEnv,
) -> TemplarResult<()> {
    let id = siblings[ix]
        .attr("ID")
        .ok_or_else(|| DomainError::structural("InputEvent", "no ID attribute"))?;
    let id = expand_string(id, env);
    let body = siblings.remove(ix);
    session.define_input_event(id, body)?;
    Ok(())
}

/// A `FILE` begin marker (with its path) or an `EOF` end marker.
fn file_marker(path: Option<&str>) -> Node {
    let mut node = match path {
        Some(p) => Node::new("FILE").with_attr("Path", p),
        None => Node::new("EOF"),
    };
    node.tail = Some("\n".into());
    node
}

/// Forward slashes throughout, doubled separators collapsed — so the tool
/// behaves the same on Unix and Windows and the dedup key is spelling-proof.
fn clean_pathname(path: &str) -> String {
    path.replace('\\', "/").replace("//", "/")
}
