//! Placeholder references and their substitution.
//!
//! The source syntax for a parameter reference is `#NAME#`. A bare `#` is
//! ambiguous inside attribute values and text once the document has been
//! parsed, so loaders rewrite every reference to the internal marker form
//! `__HASH__NAME__HSAH__` *before* parsing ([`encode_placeholders`]), and the
//! engine resolves markers against the parameter environment during the walk
//! ([`expand_string`]).
//!
//! Resolution is deliberately permissive: a marker whose parameter is unbound
//! expands to the empty string, never an error (spec taxonomy class (d),
//! soft-missing-value).

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::env::ParamEnv;

/// Identifier character class shared with the RPN tokenizer.
pub const IDENTIFIER_PATTERN: &str = r"[_A-Za-z][_A-Za-z0-9]*";

const MARKER_OPEN: &str = "__HASH__";
const MARKER_CLOSE: &str = "__HSAH__";

static SOURCE_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("#({IDENTIFIER_PATTERN})#")).unwrap());

static STRAY_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("{MARKER_OPEN}{IDENTIFIER_PATTERN}{MARKER_CLOSE}")).unwrap()
});

static MARKER_ONLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{MARKER_OPEN}({IDENTIFIER_PATTERN}){MARKER_CLOSE}$")).unwrap()
});

/// Rewrite every source-level `#NAME#` reference to its marker form.
///
/// Applied to raw document text by loaders, before XML parsing.
pub fn encode_placeholders(source: &str) -> String {
    // ${1} rather than $1: the closing marker starts with a word character,
    // which the replacement syntax would otherwise swallow into the group name.
    SOURCE_REF_RE
        .replace_all(source, format!("{MARKER_OPEN}${{1}}{MARKER_CLOSE}"))
        .into_owned()
}

/// The marker a bound parameter substitutes.
pub fn marker_for(name: &str) -> String {
    format!("{MARKER_OPEN}{name}{MARKER_CLOSE}")
}

/// If `token` is exactly one marker, the parameter name inside it.
pub fn marker_name(token: &str) -> Option<&str> {
    MARKER_ONLY_RE
        .captures(token)
        .map(|c| c.get(1).unwrap().as_str())
}

/// Resolve every marker in `s` against `env`.
///
/// Bound parameters substitute their value; whatever markers remain are
/// stripped to the empty string. Strings without markers are returned
/// unchanged (the common case — worth the scan, since almost all text in a
/// real document is literal).
pub fn expand_string(s: &str, env: &ParamEnv) -> String {
    if !s.contains(MARKER_OPEN) {
        return s.to_string();
    }
    let mut out = s.to_string();
    for (name, value) in env.iter() {
        let marker = marker_for(name);
        if out.contains(&marker) {
            out = out.replace(&marker, value);
        }
    }
    STRAY_MARKER_RE.replace_all(&out, "").into_owned()
}

/// [`expand_string`] lifted over optional text/tail fields.
pub fn expand_opt(s: Option<&str>, env: &ParamEnv) -> Option<String> {
    s.map(|s| expand_string(s, env))
}

/// Apply [`expand_string`] to every string in a subtree: tag, attribute keys
/// and values, text, and tail, recursively.
///
/// Loop bodies need this eager, deep form — the walker re-traverses spliced
/// iterations under the *outer* environment, which no longer carries the
/// loop variable.
pub fn expand_node_strings(node: &mut crate::domain::Node, env: &ParamEnv) {
    node.tag = expand_string(&node.tag, env);
    node.text = expand_opt(node.text.as_deref(), env);
    node.tail = expand_opt(node.tail.as_deref(), env);
    node.attributes = node
        .attributes
        .drain(..)
        .map(|(k, v)| (expand_string(&k, env), expand_string(&v, env)))
        .collect();
    for child in &mut node.children {
        expand_node_strings(child, env);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> ParamEnv {
        pairs.iter().copied().collect()
    }

    #[test]
    fn encode_rewrites_references() {
        assert_eq!(
            encode_placeholders("speed is #SPEED# units"),
            "speed is __HASH__SPEED__HSAH__ units"
        );
    }

    #[test]
    fn encode_ignores_invalid_names() {
        // A digit-led name is not an identifier; a lone hash stays put.
        assert_eq!(encode_placeholders("#1BAD# and # alone"), "#1BAD# and # alone");
    }

    #[test]
    fn expand_substitutes_bound_values() {
        let s = encode_placeholders("#A#+#B#");
        assert_eq!(expand_string(&s, &env(&[("A", "1"), ("B", "2")])), "1+2");
    }

    #[test]
    fn expand_strips_unbound_to_empty() {
        let s = encode_placeholders("pre #FOO# post");
        assert_eq!(expand_string(&s, &env(&[])), "pre  post");
    }

    #[test]
    fn expand_without_marker_is_identity() {
        assert_eq!(expand_string("plain text", &env(&[("A", "1")])), "plain text");
    }

    #[test]
    fn expand_replaces_every_occurrence() {
        let s = encode_placeholders("#N# #N# #N#");
        assert_eq!(expand_string(&s, &env(&[("N", "x")])), "x x x");
    }

    #[test]
    fn marker_name_round_trip() {
        assert_eq!(marker_name(&marker_for("Speed")), Some("Speed"));
        assert_eq!(marker_name("Speed"), None);
        assert_eq!(marker_name("__HASH__Speed__HSAH__ tail"), None);
    }
}
