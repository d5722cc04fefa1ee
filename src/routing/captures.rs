//! Values captured from the request path.

use std::collections::hash_map::{self, HashMap};

use serde::Serialize;

/// Reserved capture key holding the suffix matched by a `*` route.
pub const WILDCARD: &str = "*";

/// Variables and wildcard suffix extracted during a lookup.
///
/// Keys are the variable names of the matched route (`:id` binds `id`) plus
/// [`WILDCARD`] when the match went through a fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Captures {
    values: HashMap<String, String>,
}

impl Captures {
    /// Create an empty capture map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value bound to a variable name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Suffix matched by a wildcard route, if the match used one.
    pub fn wildcard(&self) -> Option<&str> {
        self.get(WILDCARD)
    }

    /// Bind a value, replacing any previous binding for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(name.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.values
    }
}

impl IntoIterator for Captures {
    type Item = (String, String);
    type IntoIter = hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Captures {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
