//! Boolean condition-tree evaluation.
//!
//! Conditions in the source language live in a two-valued *string* domain:
//! the literal texts `"True"` and `"False"`. Internally the evaluator works
//! on a real [`Truth`] enum and only renders the literal strings at the
//! substitution boundary; `Value` and `Number` terminals still produce raw
//! text because the numeric comparisons consume them.
//!
//! `And`/`Or` short-circuit. Leaf predicates are side-effect-free, so the
//! policy is unobservable from the outside; it is fixed here so every call
//! site agrees.

use tracing::trace;

use crate::domain::{DomainError, Node, ParamEnv};

/// The engine's boolean domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    True,
    False,
}

impl Truth {
    /// The literal string this value renders to in markup.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::True => "True",
            Self::False => "False",
        }
    }

    pub fn as_bool(self) -> bool {
        self == Self::True
    }
}

impl From<bool> for Truth {
    fn from(b: bool) -> Self {
        if b { Self::True } else { Self::False }
    }
}

/// Intermediate result of evaluating one expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprValue {
    Bool(Truth),
    Text(String),
}

impl ExprValue {
    /// Logical reading: `Bool` passes through, text is true iff it is the
    /// literal `"True"`.
    fn truthy(&self) -> bool {
        match self {
            Self::Bool(t) => t.as_bool(),
            Self::Text(s) => s == "True",
        }
    }

    /// Numeric reading, for the comparison operators.
    fn numeric(&self, context: &str) -> Result<f64, DomainError> {
        let text = match self {
            Self::Bool(t) => t.as_str(),
            Self::Text(s) => s.as_str(),
        };
        text.parse().map_err(|_| DomainError::NonNumericOperand {
            value: text.to_string(),
            context: context.to_string(),
        })
    }

    fn into_text(self) -> String {
        match self {
            Self::Bool(t) => t.as_str().to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Evaluate a condition tree down to [`Truth`].
pub fn eval_truth(node: &Node, env: &ParamEnv) -> Result<Truth, DomainError> {
    Ok(Truth::from(eval_expr(node, env)?.truthy()))
}

/// Evaluate one expression node.
pub fn eval_expr(node: &Node, env: &ParamEnv) -> Result<ExprValue, DomainError> {
    trace!(expr = %node.summary(), "evaluating expression");
    if node.children.is_empty() {
        return eval_terminal(node, env);
    }

    match node.tag.as_str() {
        "Not" => {
            if node.children.len() != 1 {
                return Err(DomainError::structural(
                    "Not",
                    format!("expected exactly one operand, found {}", node.children.len()),
                ));
            }
            let operand = eval_expr(&node.children[0], env)?;
            Ok(ExprValue::Bool(Truth::from(!operand.truthy())))
        }
        "And" => {
            require_operands(node, 2)?;
            for child in &node.children {
                if !eval_expr(child, env)?.truthy() {
                    return Ok(ExprValue::Bool(Truth::False));
                }
            }
            Ok(ExprValue::Bool(Truth::True))
        }
        "Or" => {
            require_operands(node, 2)?;
            for child in &node.children {
                if eval_expr(child, env)?.truthy() {
                    return Ok(ExprValue::Bool(Truth::True));
                }
            }
            Ok(ExprValue::Bool(Truth::False))
        }
        "Greater" | "Lower" | "GreaterOrEqual" | "LowerOrEqual" | "Equal" => {
            let (a, b) = binary_operands(node, env)?;
            let a = a.numeric(&node.tag)?;
            let b = b.numeric(&node.tag)?;
            let result = match node.tag.as_str() {
                "Greater" => a > b,
                "Lower" => a < b,
                "GreaterOrEqual" => a >= b,
                "LowerOrEqual" => a <= b,
                _ => a == b,
            };
            Ok(ExprValue::Bool(Truth::from(result)))
        }
        "StringEqual" => {
            let (a, b) = binary_operands(node, env)?;
            Ok(ExprValue::Bool(Truth::from(
                a.into_text() == b.into_text(),
            )))
        }
        other => Err(DomainError::UnknownExpression {
            tag: other.to_string(),
        }),
    }
}

/// Evaluate the attribute-driven leaf predicate shared by `Arg`, the
/// attribute form of `Condition`, and `Case`.
///
/// Families: `Valid` (bound, non-empty, not `"0"`/`"False"`/`"FALSE"`),
/// `NotEmpty` (bound, non-empty), `Check` with optional `Match` (equality) or
/// `Different` (inequality) or neither (bound at all). `Match`/`Different`
/// values are literals. Mixing families is fatal.
pub fn eval_leaf_predicate(
    construct: &str,
    node: &Node,
    env: &ParamEnv,
) -> Result<Truth, DomainError> {
    let valid = node.attr("Valid");
    let notempty = node.attr("NotEmpty");
    let check = node.attr("Check");
    let matches = node.attr("Match");
    let different = node.attr("Different");

    let conflict = ((valid.is_some() || notempty.is_some())
        && (check.is_some() || matches.is_some() || different.is_some()))
        || (valid.is_some() && notempty.is_some())
        || (matches.is_some() && different.is_some());
    if conflict {
        return Err(DomainError::PredicateConflict {
            construct: construct.to_string(),
        });
    }

    let result = if let Some(name) = valid {
        matches!(env.get(name), Some(v) if truthy_param_value(v))
    } else if let Some(name) = notempty {
        matches!(env.get(name), Some(v) if !v.is_empty())
    } else if let Some(name) = check {
        let value = env.get(name);
        if let Some(literal) = matches {
            value == Some(literal)
        } else if let Some(literal) = different {
            value != Some(literal)
        } else {
            value.is_some()
        }
    } else {
        return Err(DomainError::structural(
            construct,
            "no predicate attribute (expected Valid, NotEmpty, or Check)",
        ));
    };

    trace!(
        construct,
        predicate = %node.summary(),
        result = Truth::from(result).as_str(),
        "evaluated leaf predicate"
    );
    Ok(Truth::from(result))
}

/// The `Valid` falsy set: empty, `"0"`, and both spellings of false.
pub(crate) fn truthy_param_value(value: &str) -> bool {
    !value.is_empty() && value != "0" && value != "False" && value != "FALSE"
}

fn eval_terminal(node: &Node, env: &ParamEnv) -> Result<ExprValue, DomainError> {
    match node.tag.as_str() {
        "Arg" => Ok(ExprValue::Bool(eval_leaf_predicate("Arg", node, env)?)),
        "Value" => {
            // A Value naming an unbound parameter reads as zero, by contract.
            let name = node.text.as_deref().unwrap_or("");
            Ok(ExprValue::Text(
                env.get(name).unwrap_or("0").to_string(),
            ))
        }
        "Number" => Ok(ExprValue::Text(
            node.text.clone().unwrap_or_default(),
        )),
        other => Err(DomainError::UnknownExpression {
            tag: other.to_string(),
        }),
    }
}

fn require_operands(node: &Node, minimum: usize) -> Result<(), DomainError> {
    if node.children.len() < minimum {
        return Err(DomainError::structural(
            &node.tag,
            format!(
                "expected at least {minimum} operands, found {}",
                node.children.len()
            ),
        ));
    }
    Ok(())
}

fn binary_operands(node: &Node, env: &ParamEnv) -> Result<(ExprValue, ExprValue), DomainError> {
    if node.children.len() != 2 {
        return Err(DomainError::structural(
            &node.tag,
            format!("expected exactly two operands, found {}", node.children.len()),
        ));
    }
    let a = eval_expr(&node.children[0], env)?;
    let b = eval_expr(&node.children[1], env)?;
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> ParamEnv {
        pairs.iter().copied().collect()
    }

    fn value(name: &str) -> Node {
        Node::new("Value").with_text(name)
    }

    fn number(n: &str) -> Node {
        Node::new("Number").with_text(n)
    }

    #[test]
    fn value_of_unbound_parameter_is_zero() {
        let v = eval_expr(&value("MISSING"), &env(&[])).unwrap();
        assert_eq!(v, ExprValue::Text("0".into()));
    }

    #[test]
    fn greater_compares_numerically() {
        let expr = Node::new("Greater")
            .with_child(value("N"))
            .with_child(number("5"));
        assert_eq!(eval_truth(&expr, &env(&[("N", "10")])).unwrap(), Truth::True);
        assert_eq!(eval_truth(&expr, &env(&[("N", "3")])).unwrap(), Truth::False);
        // "10" > "5" is false lexically but true numerically; this must be numeric.
        assert_eq!(eval_truth(&expr, &env(&[("N", "10")])).unwrap(), Truth::True);
    }

    #[test]
    fn equal_is_numeric_string_equal_is_literal() {
        let eq = Node::new("Equal")
            .with_child(number("1.0"))
            .with_child(number("1"));
        assert_eq!(eval_truth(&eq, &env(&[])).unwrap(), Truth::True);

        let seq = Node::new("StringEqual")
            .with_child(number("1.0"))
            .with_child(number("1"));
        assert_eq!(eval_truth(&seq, &env(&[])).unwrap(), Truth::False);
    }

    #[test]
    fn not_negates() {
        let expr = Node::new("Not").with_child(
            Node::new("Arg").with_attr("Valid", "P"),
        );
        assert_eq!(eval_truth(&expr, &env(&[("P", "1")])).unwrap(), Truth::False);
        assert_eq!(eval_truth(&expr, &env(&[])).unwrap(), Truth::True);
    }

    #[test]
    fn and_requires_all_or_fails_fast() {
        let expr = Node::new("And")
            .with_child(Node::new("Arg").with_attr("Valid", "A"))
            .with_child(Node::new("Arg").with_attr("Valid", "B"));
        assert_eq!(
            eval_truth(&expr, &env(&[("A", "1"), ("B", "1")])).unwrap(),
            Truth::True
        );
        assert_eq!(eval_truth(&expr, &env(&[("A", "1")])).unwrap(), Truth::False);
    }

    #[test]
    fn or_takes_first_success() {
        let expr = Node::new("Or")
            .with_child(Node::new("Arg").with_attr("Valid", "A"))
            .with_child(Node::new("Arg").with_attr("Valid", "B"));
        assert_eq!(eval_truth(&expr, &env(&[("B", "1")])).unwrap(), Truth::True);
        assert_eq!(eval_truth(&expr, &env(&[])).unwrap(), Truth::False);
    }

    #[test]
    fn and_with_one_operand_is_structural_error() {
        let expr = Node::new("And").with_child(number("1"));
        assert!(matches!(
            eval_expr(&expr, &env(&[])).unwrap_err(),
            DomainError::Structural { .. }
        ));
    }

    #[test]
    fn unknown_operator_is_fatal() {
        let expr = Node::new("Xor")
            .with_child(number("1"))
            .with_child(number("2"));
        assert_eq!(
            eval_expr(&expr, &env(&[])).unwrap_err(),
            DomainError::UnknownExpression { tag: "Xor".into() }
        );
    }

    #[test]
    fn comparison_of_non_numeric_text_is_fatal() {
        let expr = Node::new("Lower")
            .with_child(value("P"))
            .with_child(number("5"));
        let err = eval_expr(&expr, &env(&[("P", "fast")])).unwrap_err();
        assert!(matches!(err, DomainError::NonNumericOperand { .. }));
    }

    // ── leaf predicate families ───────────────────────────────────────────

    #[test]
    fn valid_rejects_zero_and_false_spellings() {
        let node = Node::new("Arg").with_attr("Valid", "P");
        for falsy in ["", "0", "False", "FALSE"] {
            assert_eq!(
                eval_leaf_predicate("Arg", &node, &env(&[("P", falsy)])).unwrap(),
                Truth::False,
                "Valid should reject {falsy:?}"
            );
        }
        assert_eq!(
            eval_leaf_predicate("Arg", &node, &env(&[("P", "yes")])).unwrap(),
            Truth::True
        );
        assert_eq!(eval_leaf_predicate("Arg", &node, &env(&[])).unwrap(), Truth::False);
    }

    #[test]
    fn notempty_accepts_zero() {
        let node = Node::new("Arg").with_attr("NotEmpty", "P");
        assert_eq!(
            eval_leaf_predicate("Arg", &node, &env(&[("P", "0")])).unwrap(),
            Truth::True
        );
        assert_eq!(
            eval_leaf_predicate("Arg", &node, &env(&[("P", "")])).unwrap(),
            Truth::False
        );
    }

    #[test]
    fn check_families() {
        let presence = Node::new("Arg").with_attr("Check", "P");
        assert_eq!(
            eval_leaf_predicate("Arg", &presence, &env(&[("P", "")])).unwrap(),
            Truth::True
        );
        assert_eq!(eval_leaf_predicate("Arg", &presence, &env(&[])).unwrap(), Truth::False);

        let matched = Node::new("Arg").with_attr("Check", "P").with_attr("Match", "on");
        assert_eq!(
            eval_leaf_predicate("Arg", &matched, &env(&[("P", "on")])).unwrap(),
            Truth::True
        );
        assert_eq!(
            eval_leaf_predicate("Arg", &matched, &env(&[("P", "off")])).unwrap(),
            Truth::False
        );

        let different = Node::new("Arg")
            .with_attr("Check", "P")
            .with_attr("Different", "on");
        assert_eq!(
            eval_leaf_predicate("Arg", &different, &env(&[("P", "off")])).unwrap(),
            Truth::True
        );
        // Unbound compares as different.
        assert_eq!(
            eval_leaf_predicate("Arg", &different, &env(&[])).unwrap(),
            Truth::True
        );
    }

    #[test]
    fn mixing_predicate_families_is_fatal() {
        let node = Node::new("Arg")
            .with_attr("Valid", "P")
            .with_attr("Check", "Q");
        assert_eq!(
            eval_leaf_predicate("Condition", &node, &env(&[])).unwrap_err(),
            DomainError::PredicateConflict {
                construct: "Condition".into()
            }
        );

        let node = Node::new("Arg")
            .with_attr("Check", "P")
            .with_attr("Match", "1")
            .with_attr("Different", "2");
        assert!(eval_leaf_predicate("Arg", &node, &env(&[])).is_err());
    }

    #[test]
    fn predicate_without_attributes_is_fatal() {
        let node = Node::new("Arg");
        assert!(matches!(
            eval_leaf_predicate("Arg", &node, &env(&[])).unwrap_err(),
            DomainError::Structural { .. }
        ));
    }
}
