use std::collections::HashMap;

use super::error::BuildError;

/// The ordered attribute names that define the levels of an index.
///
/// Level `i` of the index branches on `names()[i]`. Lookups from name to
/// level are O(1). Attribute names must be unique and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeOrder {
    names: Vec<String>,
    depths: HashMap<String, usize>,
}

impl AttributeOrder {
    /// Build an attribute order from a sequence of names.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateAttribute`] if a name repeats, or
    /// [`BuildError::EmptyAttributeName`] if a name is empty.
    pub fn new<I, S>(names: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut order = Self {
            names: Vec::new(),
            depths: HashMap::new(),
        };
        for name in names {
            order.push(name.into())?;
        }
        Ok(order)
    }

    fn push(&mut self, name: String) -> Result<(), BuildError> {
        if name.is_empty() {
            return Err(BuildError::EmptyAttributeName {
                position: self.names.len(),
            });
        }
        if self.depths.contains_key(&name) {
            return Err(BuildError::DuplicateAttribute { name });
        }
        self.depths.insert(name.clone(), self.names.len());
        self.names.push(name);
        Ok(())
    }

    /// The level at which `name` is consulted, if it is part of the order.
    #[must_use]
    pub fn depth_of(&self, name: &str) -> Option<usize> {
        self.depths.get(name).copied()
    }

    /// The attribute consulted at `depth`.
    #[must_use]
    pub fn name_at(&self, depth: usize) -> Option<&str> {
        self.names.get(depth).map(String::as_str)
    }

    /// Whether `name` is part of the order.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.depths.contains_key(name)
    }

    /// The number of attributes, which is also the depth of every leaf.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Attribute names in level order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
