use std::collections::{BTreeMap, BTreeSet};

use super::Value;

/// An object to classify: an identifier plus a set of values per attribute.
///
/// Attributes may be absent or multi-valued. Setting an attribute adds to its
/// value set rather than replacing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Object {
    id: String,
    attributes: BTreeMap<String, BTreeSet<Value>>,
}

impl Object {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add a value to `attribute`.
    #[must_use]
    pub fn set(mut self, attribute: &str, value: impl Into<Value>) -> Self {
        self.insert(attribute, value.into());
        self
    }

    /// Add every value in `values` to `attribute`.
    #[must_use]
    pub fn set_all<I, V>(mut self, attribute: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let entry = self.attributes.entry(attribute.to_owned()).or_default();
        entry.extend(values.into_iter().map(Into::into));
        self
    }

    /// Add a value to `attribute` (mutable reference version).
    pub fn insert(&mut self, attribute: &str, value: Value) {
        self.attributes
            .entry(attribute.to_owned())
            .or_default()
            .insert(value);
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The values observed for `attribute`, or `None` if the attribute is
    /// absent or was given an empty set.
    #[must_use]
    pub fn values(&self, attribute: &str) -> Option<&BTreeSet<Value>> {
        self.attributes.get(attribute).filter(|set| !set.is_empty())
    }

    /// All attributes with their values, in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &BTreeSet<Value>)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }
}
