//! `Loop` expansion: bounded repetition of a `Do` body.

use tracing::debug;

use crate::domain::{DomainError, Node, ParamEnv, expand_node_strings, expand_string};
use crate::eval::{Truth, eval_truth, number_text};

/// Iteration cap applied when a loop has neither `To` nor `While` — the
/// runaway guard for malformed input.
pub const UNBOUNDED_LOOP_CAP: usize = 64;

/// Consume the `Loop` element at `siblings[ix]` and splice one substituted
/// deep copy of the `Do` body per iteration.
///
/// `Setup` binds the loop variable (`Param`) to `From` in a scoped copy of
/// the environment and advances it by `Inc` (default 1) after every
/// iteration. Termination, checked after the advance: `To` reached or
/// crossed direction-aware, or `While` false, or — with neither present —
/// [`UNBOUNDED_LOOP_CAP`] iterations. The final spliced element inherits the
/// `Loop` element's tail so trailing content survives.
pub(crate) fn expand_loop(
    siblings: &mut Vec<Node>,
    ix: usize,
    env: &ParamEnv,
) -> Result<(), DomainError> {
    let elem = siblings.remove(ix);
    let mut env = env.scoped();

    let setup = single_child(&elem, "Setup")?;
    let do_body = single_child(&elem, "Do")?;
    // `Then` is recognised and bounded but carries no expansion semantics.
    if elem.count_named("Then") > 1 {
        return Err(DomainError::structural(
            "Loop",
            "more than one \"Then\" child",
        ));
    }

    if setup.count_named("Param") != 1
        || setup.count_named("From") != 1
        || setup.count_named("Inc") > 1
        || setup.count_named("To") > 1
        || setup.count_named("While") > 1
        || (setup.count_named("To") == 1 && setup.count_named("While") == 1)
    {
        return Err(DomainError::structural("Loop", "Setup syntax error"));
    }

    let var = setup
        .child_named("Param")
        .expect("counted above")
        .text
        .clone()
        .ok_or_else(|| DomainError::structural("Loop", "Param child has no text"))?;
    let mut value = numeric_bound(setup.child_named("From").expect("counted above"), "From", &env)?;
    let inc = match setup.child_named("Inc") {
        Some(node) => numeric_bound(node, "Inc", &env)?,
        None => 1.0,
    };
    let to = setup
        .child_named("To")
        .map(|node| numeric_bound(node, "To", &env))
        .transpose()?;
    let condition = match setup.child_named("While") {
        Some(node) if node.children.len() == 1 => Some(&node.children[0]),
        Some(node) => {
            return Err(DomainError::structural(
                "Loop",
                format!("invalid While tree {}", node.summary()),
            ));
        }
        None => None,
    };

    debug!(
        var = %var,
        from = value,
        inc,
        to = ?to,
        bounded_by_while = condition.is_some(),
        "expanding Loop"
    );

    env.bind(var.clone(), number_text(value));
    let mut at = ix;
    let mut iterations = 0usize;

    loop {
        for child in &do_body.children {
            let mut copy = child.deep_copy();
            expand_node_strings(&mut copy, &env);
            siblings.insert(at, copy);
            at += 1;
        }
        iterations += 1;
        if to.is_none() && condition.is_none() && iterations == UNBOUNDED_LOOP_CAP {
            break;
        }
        value += inc;
        env.bind(var.clone(), number_text(value));
        if let Some(to) = to {
            if (inc > 0.0 && value >= to) || (inc < 0.0 && value <= to) {
                break;
            }
        }
        if let Some(expr) = condition {
            if eval_truth(expr, &env)? == Truth::False {
                break;
            }
        }
    }

    // The last spliced element takes over the Loop element's tail.
    if at > ix {
        siblings[at - 1].tail = elem.tail;
    }
    Ok(())
}

fn single_child<'a>(elem: &'a Node, tag: &str) -> Result<&'a Node, DomainError> {
    match elem.count_named(tag) {
        0 => Err(DomainError::structural(
            "Loop",
            format!("no \"{tag}\" child"),
        )),
        1 => Ok(elem.child_named(tag).expect("counted one")),
        _ => Err(DomainError::structural(
            "Loop",
            format!("more than one \"{tag}\" child"),
        )),
    }
}

fn numeric_bound(node: &Node, name: &str, env: &ParamEnv) -> Result<f64, DomainError> {
    let text = expand_string(node.text.as_deref().unwrap_or(""), env);
    text.trim()
        .parse()
        .map_err(|_| DomainError::NonNumericOperand {
            value: text,
            context: format!("Loop \"{name}\" bound"),
        })
}
