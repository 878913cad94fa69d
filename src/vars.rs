//! Session variables substituted into command arguments.

use std::collections::BTreeMap;

/// Prefix marking a token as a variable reference.
pub const VARIABLE_MARKER: char = '%';

/// Name -> value map living for the whole session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    vars: BTreeMap<String, String>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or overwrite a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Substitute a `%name` token with the value of `name`.
    ///
    /// Tokens without the marker, and references to undefined names, come back
    /// unchanged. The substituted value is not resolved again.
    pub fn resolve<'a>(&'a self, token: &'a str) -> &'a str {
        token
            .strip_prefix(VARIABLE_MARKER)
            .and_then(|name| self.get(name))
            .unwrap_or(token)
    }

    /// Resolve every whitespace-delimited token of `args`.
    pub fn resolve_all<'a, I>(&self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        args.into_iter()
            .map(|token| self.resolve(token).to_string())
            .collect()
    }

    /// Variables in name order.
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

impl FromIterator<(String, String)> for VariableStore {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}
