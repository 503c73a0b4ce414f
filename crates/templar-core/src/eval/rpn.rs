//! Postfix (RPN) arithmetic evaluation.
//!
//! `Process` attributes request that a parameter value be evaluated as a
//! postfix expression over numeric literals and placeholder references, with
//! `+ - * /`. The stack is numeric (f64); the requested [`NumericKind`]
//! decides how the final value is rendered back to text.
//!
//! # Pass-through
//!
//! Source documents embed runtime expressions (`if{`, simulator variable
//! syntax, …) that only the downstream consumer can evaluate. A token outside
//! every known class — or a placeholder resolving to non-numeric text — makes
//! the whole expression pass through unevaluated, with placeholder references
//! resolved. Genuine errors stay fatal: a bare identifier that is not a
//! placeholder marker, operator underflow, surplus stack values, and empty
//! expressions.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::domain::{DomainError, ParamEnv, expand_string, marker_name, placeholder};
use crate::eval::float_text;

const NUMBER_PATTERN: &str = r"-?\d+(?:\.\d+)?";

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{NUMBER_PATTERN}|{id}|[+\-*/]|\s+|.",
        id = placeholder::IDENTIFIER_PATTERN
    ))
    .unwrap()
});

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{NUMBER_PATTERN}$")).unwrap());

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{}$", placeholder::IDENTIFIER_PATTERN)).unwrap());

/// Requested result type for an RPN evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    /// Truncate toward zero, render without a decimal point.
    Int,
    /// Full precision, integral values render with a trailing `.0`.
    Float,
    /// Stringified stack top (same rendering as `Float`).
    String,
}

impl NumericKind {
    /// Map a `Process` attribute value to a kind, if it names one.
    pub fn from_process(kind: &str) -> Option<Self> {
        match kind {
            "Int" => Some(Self::Int),
            "Float" => Some(Self::Float),
            "String" => Some(Self::String),
            _ => None,
        }
    }
}

/// Evaluate `expr` as postfix arithmetic and render the result per `kind`.
pub fn eval_rpn(expr: &str, kind: NumericKind, env: &ParamEnv) -> Result<String, DomainError> {
    trace!(expr, ?kind, "evaluating RPN");
    let mut stack: Vec<f64> = Vec::new();

    for token in TOKEN_RE.find_iter(expr) {
        let token = token.as_str();
        if token.chars().all(char::is_whitespace) {
            continue;
        }
        if NUMBER_RE.is_match(token) {
            stack.push(token.parse().expect("matched number pattern"));
        } else if IDENTIFIER_RE.is_match(token) {
            if marker_name(token).is_none() {
                return Err(DomainError::RpnInvalidIdentifier {
                    token: token.to_string(),
                });
            }
            let resolved = expand_string(token, env);
            match resolved.parse::<f64>() {
                Ok(value) => stack.push(value),
                // Parameter holds runtime text; keep the expression verbatim.
                Err(_) => return Ok(pass_through(expr, env)),
            }
        } else if let Some(op) = operator(token) {
            if stack.len() < 2 {
                return Err(DomainError::RpnUnderflow {
                    operator: op,
                    expr: expr.to_string(),
                });
            }
            let b = stack.pop().expect("checked length");
            let a = stack.pop().expect("checked length");
            stack.push(apply(op, a, b));
        } else {
            // Unrecognized token: a runtime expression for the consumer.
            return Ok(pass_through(expr, env));
        }
    }

    if stack.len() > 1 {
        return Err(DomainError::RpnSurplus {
            expr: expr.to_string(),
        });
    }
    let value = stack.pop().ok_or(DomainError::RpnEmpty)?;

    let result = match kind {
        NumericKind::Int => (value as i64).to_string(),
        NumericKind::Float | NumericKind::String => float_text(value),
    };
    trace!(expr, result, "evaluated RPN");
    Ok(result)
}

/// Evaluate a `Process`-qualified value.
///
/// `Param` looks the (placeholder-expanded) value up as a parameter name —
/// unbound resolves to the empty string, the soft-missing-value rule. The
/// numeric kinds dispatch to [`eval_rpn`]. Anything else is fatal.
pub fn eval_param(value: &str, kind: &str, env: &ParamEnv) -> Result<String, DomainError> {
    if kind == "Param" {
        let name = expand_string(value, env);
        return Ok(env.get(&name).unwrap_or_default().to_string());
    }
    match NumericKind::from_process(kind) {
        Some(numeric) => eval_rpn(value, numeric, env),
        None => Err(DomainError::UnknownProcessKind {
            kind: kind.to_string(),
        }),
    }
}

fn pass_through(expr: &str, env: &ParamEnv) -> String {
    trace!(expr, "RPN pass-through");
    expand_string(expr, env)
}

fn operator(token: &str) -> Option<char> {
    match token {
        "+" => Some('+'),
        "-" => Some('-'),
        "*" => Some('*'),
        "/" => Some('/'),
        _ => None,
    }
}

fn apply(op: char, a: f64, b: f64) -> f64 {
    match op {
        '+' => a + b,
        '-' => a - b,
        '*' => a * b,
        '/' => a / b,
        _ => unreachable!("operator() only admits the four arithmetic ops"),
    }
}
