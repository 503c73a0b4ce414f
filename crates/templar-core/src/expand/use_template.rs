//! `UseTemplate` expansion: template invocation with layered parameters.
//!
//! The environment a template body observes is built in three layers:
//! call-site arguments (evaluated in the caller's environment), then
//! `DefaultTemplateParameters` (bound only where the name is still free, so
//! call-site arguments win), then `OverrideTemplateParameters` (bound
//! unconditionally). Defaults and overrides are declared inside the body and
//! evaluated against the callee's *accumulating* environment, so earlier
//! declarations are visible to later ones.

use std::path::Path;

use tracing::debug;

use crate::domain::{DomainError, Node, ParamEnv, expand_string};
use crate::error::TemplarResult;
use crate::eval::eval_param;
use crate::expand::session::{ExpansionSession, TemplateStrictness};
use crate::expand::walker;

/// Consume the `UseTemplate` element at `siblings[ix]` and splice its
/// expansion at the same position.
pub(crate) fn expand_use_template(
    session: &mut ExpansionSession<'_>,
    siblings: &mut Vec<Node>,
    ix: usize,
    env: &ParamEnv,
    current_file: &Path,
) -> TemplarResult<()> {
    let name_raw = siblings[ix]
        .attr("Name")
        .ok_or_else(|| DomainError::structural("UseTemplate", "no Name attribute"))?
        .to_string();
    let name = expand_string(&name_raw, env);

    if session.template(&name).is_none() {
        return match session.strictness() {
            TemplateStrictness::Strict => Err(DomainError::UndefinedTemplate { name }.into()),
            TemplateStrictness::Lenient => {
                debug!(template = %name, "undefined template, call dropped");
                siblings.remove(ix);
                Ok(())
            }
        };
    }

    let mut call = siblings.remove(ix);
    debug!(template = %name, call = %call.summary(), "expanding UseTemplate");

    // Arguments may be wrapped in conditionals or loops; expand the call
    // site's children as a normal walk in the caller's environment first.
    let mut call_env = env.scoped();
    walker::expand_children(session, &mut call, &mut call_env, current_file, false)?;

    // Layer 1: call-site arguments, accumulated left to right.
    let mut callee_env = env.scoped();
    for arg in &call.children {
        let mut value = arg.text.clone().unwrap_or_default();
        if let Some(process) = arg.attr("Process") {
            value = eval_param(&value, process, &callee_env)?;
        }
        debug!(parameter = %arg.tag, value = %value, "call parameter");
        callee_env.bind(arg.tag.clone(), value);
    }

    // Layers 2 and 3 happen during the body walk: parameter-list elements at
    // the body's top level route to `expand_parameter_list`.
    let mut body = session
        .template(&name)
        .expect("presence checked above")
        .deep_copy();
    walker::expand_children(session, &mut body, &mut callee_env, current_file, true)?;

    siblings.splice(ix..ix, body.children);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamListKind {
    Default,
    Override,
    Editable,
}

/// Consume a parameter-list element inside a template body and fold its
/// declarations into the accumulating environment.
///
/// Declarations may be wrapped in control constructs; every entry is run
/// through a walk in the environment accumulated so far before its
/// survivors are bound. `EditableTemplateParameters` is author-tooling
/// metadata: consumed, nothing bound.
pub(crate) fn expand_parameter_list(
    session: &mut ExpansionSession<'_>,
    siblings: &mut Vec<Node>,
    ix: usize,
    env: &mut ParamEnv,
    current_file: &Path,
) -> TemplarResult<()> {
    let elem = siblings.remove(ix);
    let kind = match elem.tag.as_str() {
        "DefaultTemplateParameters" => ParamListKind::Default,
        "OverrideTemplateParameters" => ParamListKind::Override,
        "EditableTemplateParameters" => ParamListKind::Editable,
        "Parameters" => match elem.attr("Type") {
            Some("Default") => ParamListKind::Default,
            Some("Override") => ParamListKind::Override,
            _ => {
                return Err(DomainError::UnknownParameterList {
                    summary: elem.summary(),
                }
                .into());
            }
        },
        _ => {
            return Err(DomainError::UnknownParameterList {
                summary: elem.summary(),
            }
            .into());
        }
    };

    if kind == ParamListKind::Editable {
        debug!(list = %elem.summary(), "dropped editable parameter metadata");
        return Ok(());
    }

    for entry in elem.children {
        let mut staging = Node::new("Declarations");
        staging.children.push(entry);
        walker::expand_children(session, &mut staging, env, current_file, false)?;
        for decl in staging.children {
            bind_declaration(kind, &decl, env)?;
        }
    }
    Ok(())
}

fn bind_declaration(
    kind: ParamListKind,
    decl: &Node,
    env: &mut ParamEnv,
) -> Result<(), DomainError> {
    let name = decl.tag.as_str();
    match kind {
        ParamListKind::Default => {
            if env.contains(name) {
                debug!(parameter = %name, "already provided in call stack");
                return Ok(());
            }
            let value = declared_value(decl, env)?;
            debug!(parameter = %name, value = %value, "default parameter");
            env.bind(name, value);
        }
        ParamListKind::Override => {
            // A bare override with no value unbinds rather than setting "".
            if decl.text.is_none() && decl.attr("Process").is_none() {
                debug!(parameter = %name, "override removes parameter");
                env.unbind(name);
                return Ok(());
            }
            let value = declared_value(decl, env)?;
            debug!(parameter = %name, value = %value, "override parameter");
            env.bind(name, value);
        }
        ParamListKind::Editable => unreachable!("editable lists are dropped before binding"),
    }
    Ok(())
}

fn declared_value(decl: &Node, env: &ParamEnv) -> Result<String, DomainError> {
    let value = decl.text.clone().unwrap_or_default();
    match decl.attr("Process") {
        Some(process) => eval_param(&value, process, env),
        None => Ok(value),
    }
}
