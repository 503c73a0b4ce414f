//! The parameter environment.
//!
//! A flat name → value map with *value-copy* scoping: every scope boundary
//! (template call, loop body, recursive descent into an ordinary child) clones
//! the environment, so a callee mutating its copy can never leak bindings back
//! into the caller. This copy discipline is the only isolation mechanism the
//! engine relies on.
//!
//! Absence of a key is distinct from a bound empty string — `Valid` and
//! `NotEmpty` predicates observe the difference.

use indexmap::IndexMap;

/// Parameter bindings for one expansion scope.
///
/// Iteration follows insertion order, which keeps placeholder substitution
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamEnv {
    vars: IndexMap<String, String>,
}

impl ParamEnv {
    /// Empty environment (the root document scope).
    pub fn new() -> Self {
        Self::default()
    }

    /// Value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Whether `name` is bound at all (even to the empty string).
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Bind `name`, replacing any existing value.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Remove a binding, returning the previous value.
    pub fn unbind(&mut self, name: &str) -> Option<String> {
        self.vars.shift_remove(name)
    }

    /// Value copy for a new scope.
    pub fn scoped(&self) -> ParamEnv {
        self.clone()
    }

    /// Iterate bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamEnv {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_binding_is_not_absence() {
        let mut env = ParamEnv::new();
        env.bind("P", "");
        assert!(env.contains("P"));
        assert_eq!(env.get("P"), Some(""));
        assert!(!env.contains("Q"));
        assert_eq!(env.get("Q"), None);
    }

    #[test]
    fn scoped_copy_isolates_mutation() {
        let mut outer = ParamEnv::new();
        outer.bind("Speed", "10");
        let mut inner = outer.scoped();
        inner.bind("Speed", "99");
        inner.bind("Extra", "1");
        assert_eq!(outer.get("Speed"), Some("10"));
        assert!(!outer.contains("Extra"));
    }

    #[test]
    fn unbind_removes_key() {
        let mut env: ParamEnv = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(env.unbind("A"), Some("1".to_string()));
        assert!(!env.contains("A"));
        assert_eq!(env.unbind("A"), None);
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let env: ParamEnv = [("Z", "1"), ("A", "2"), ("M", "3")].into_iter().collect();
        let names: Vec<_> = env.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }
}
