use std::collections::BTreeMap;
use std::fmt;

use super::object::Object;
use super::selector::{none_of, one_of, Selector};
use super::Value;

/// A classification rule: a code plus one optional selector per attribute.
///
/// Attributes without a selector are unconstrained. Rules are usually added
/// through [`IndexBuilder::rule()`](super::IndexBuilder::rule), but can be
/// built standalone for rule sources that produce records.
///
/// ```
/// use ruletree::Rule;
///
/// let rule = Rule::new("store_3").none_of("brand", ["Adidas", "Puma"]);
/// assert_eq!(rule.code, "store_3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub code: String,
    pub selectors: BTreeMap<String, Selector>,
}

impl Rule {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            selectors: BTreeMap::new(),
        }
    }

    /// Set the selector for `attribute`, replacing any previous one.
    #[must_use]
    pub fn with(mut self, attribute: &str, selector: Selector) -> Self {
        self.selectors.insert(attribute.to_owned(), selector);
        self
    }

    /// Accept objects carrying any of `values` for `attribute`.
    #[must_use]
    pub fn one_of<I, V>(self, attribute: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.with(attribute, one_of(values))
    }

    /// Reject objects carrying any of `values` for `attribute`.
    #[must_use]
    pub fn none_of<I, V>(self, attribute: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.with(attribute, none_of(values))
    }

    /// Explicitly leave `attribute` unconstrained.
    #[must_use]
    pub fn any(self, attribute: &str) -> Self {
        self.with(attribute, Selector::Any)
    }

    #[must_use]
    pub fn selector(&self, attribute: &str) -> Option<&Selector> {
        self.selectors.get(attribute)
    }

    /// Evaluate this rule against `object` by checking every selector in turn.
    ///
    /// This is the linear scan the index exists to avoid. It is kept as the
    /// reference semantics: for rules whose selectors all name attributes of
    /// the index's attribute order, `Index::matches` contains this rule's code
    /// exactly when this returns `true`.
    #[must_use]
    pub fn matches(&self, object: &Object) -> bool {
        self.selectors
            .iter()
            .all(|(attribute, selector)| selector.admits(object.values(attribute)))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule {}", self.code)?;
        let mut sep = ": ";
        for (attribute, selector) in &self.selectors {
            write!(f, "{sep}{attribute} {selector}")?;
            sep = ", ";
        }
        Ok(())
    }
}
