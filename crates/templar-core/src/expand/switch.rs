//! `Switch` expansion: first matching `Case` wins, `Default` as fallback.

use tracing::debug;

use crate::domain::{DomainError, Node, ParamEnv};
use crate::eval::expr::truthy_param_value;

/// Consume the `Switch` element at `siblings[ix]` and splice the children of
/// at most one selected case.
///
/// The optional `Param` attribute names a parameter whose value drives
/// `Value` matching. Cases are tried in document order; within one case the
/// checks run in the order `Value`, `Valid`, `Check` (+`Match`/`Different`),
/// `NotEmpty`. `Value`, `Match`, and `Different` attribute values are
/// literals — never placeholder-expanded.
pub(crate) fn expand_switch(
    siblings: &mut Vec<Node>,
    ix: usize,
    env: &ParamEnv,
) -> Result<(), DomainError> {
    let mut elem = siblings.remove(ix);

    if elem.count_named("Default") > 1 {
        return Err(DomainError::structural(
            "Switch",
            "more than one \"Default\" child",
        ));
    }
    if elem.count_named("Case") == 0 && elem.count_named("Default") == 0 {
        return Err(DomainError::structural(
            "Switch",
            "neither \"Case\" nor \"Default\" children",
        ));
    }

    let param_value = elem
        .attr("Param")
        .and_then(|name| env.get(name))
        .map(str::to_string);

    let mut selected: Option<usize> = None;
    for (i, case) in elem.children.iter().enumerate() {
        if case.tag != "Case" {
            continue;
        }
        if case_matches(case, param_value.as_deref(), env) {
            selected = Some(i);
            break;
        }
    }
    let selected =
        selected.or_else(|| elem.children.iter().position(|c| c.tag == "Default"));

    debug!(
        switch = %elem.summary(),
        matched = selected.is_some(),
        "expanded Switch"
    );

    let picked = match selected {
        Some(i) => elem.children.remove(i).children,
        None => Vec::new(),
    };
    siblings.splice(ix..ix, picked);
    Ok(())
}

fn case_matches(case: &Node, param_value: Option<&str>, env: &ParamEnv) -> bool {
    if let (Some(value), Some(param)) = (case.attr("Value"), param_value) {
        if param == value {
            return true;
        }
    }
    if let Some(name) = case.attr("Valid") {
        if matches!(env.get(name), Some(v) if truthy_param_value(v)) {
            return true;
        }
    }
    if let Some(name) = case.attr("Check") {
        let value = env.get(name);
        if let Some(literal) = case.attr("Match") {
            if value == Some(literal) {
                return true;
            }
        } else if let Some(literal) = case.attr("Different") {
            // An unbound parameter counts as different, same as the
            // Condition-side predicate.
            if value != Some(literal) {
                return true;
            }
        } else if value.is_some() {
            return true;
        }
    }
    if let Some(name) = case.attr("NotEmpty") {
        if matches!(env.get(name), Some(v) if !v.is_empty()) {
            return true;
        }
    }
    false
}
