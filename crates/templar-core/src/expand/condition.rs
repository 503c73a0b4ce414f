//! `Condition` expansion: splice one of two branches in place.

use tracing::debug;

use crate::domain::{DomainError, Node, ParamEnv};
use crate::eval::{Truth, eval_leaf_predicate, eval_truth};

/// Consume the `Condition` element at `siblings[ix]` and splice the selected
/// branch at the same position.
///
/// Two forms:
/// - attribute form — the element's own attributes are a leaf predicate;
/// - tree form (no attributes) — the first child must be `Test`, whose
///   children combine under an implicit And.
///
/// On success the `True` wrapper's children are spliced when such a wrapper
/// exists, otherwise all children except `Test` nodes. On failure the `False`
/// wrapper's children are spliced when present, else nothing.
pub(crate) fn expand_condition(
    siblings: &mut Vec<Node>,
    ix: usize,
    env: &ParamEnv,
) -> Result<(), DomainError> {
    let elem = siblings.remove(ix);

    let trues = elem.count_named("True");
    let falses = elem.count_named("False");
    if trues > 1 || falses > 1 {
        return Err(DomainError::structural(
            "Condition",
            "too many True or False children",
        ));
    }

    let success = if elem.attributes.is_empty() {
        match elem.children.len() {
            0 => {
                return Err(DomainError::structural(
                    "Condition",
                    "no attributes and no children",
                ));
            }
            1 => {
                return Err(DomainError::structural(
                    "Condition",
                    "no attributes and just one child",
                ));
            }
            _ => {}
        }
        let test = &elem.children[0];
        if test.tag != "Test" {
            return Err(DomainError::structural(
                "Condition",
                "no attributes but first child is not a Test element",
            ));
        }
        // A Test with several children implies an And across all of them.
        let mut all = Truth::True;
        for child in &test.children {
            if eval_truth(child, env)? == Truth::False {
                all = Truth::False;
                break;
            }
        }
        all
    } else {
        eval_leaf_predicate("Condition", &elem, env)?
    };

    debug!(condition = %elem.summary(), result = success.as_str(), "expanded Condition");

    let picked: Vec<Node> = if success.as_bool() {
        if trues == 1 {
            elem.children
                .into_iter()
                .find(|c| c.tag == "True")
                .expect("counted one True wrapper")
                .children
        } else {
            elem.children
                .into_iter()
                .filter(|c| c.tag != "Test")
                .collect()
        }
    } else if falses == 1 {
        elem.children
            .into_iter()
            .find(|c| c.tag == "False")
            .expect("counted one False wrapper")
            .children
    } else {
        Vec::new()
    };

    siblings.splice(ix..ix, picked);
    Ok(())
}
