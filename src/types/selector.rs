use std::collections::BTreeSet;
use std::fmt;

use super::Value;

/// A rule's constraint on one attribute.
///
/// An attribute the rule does not mention behaves exactly like
/// [`Selector::Any`]. A positive or negative selector with no values is also
/// treated as a wildcard when the index is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// The object must carry at least one of these values.
    Positive(BTreeSet<Value>),
    /// The object must carry none of these values.
    Negative(BTreeSet<Value>),
    /// No constraint.
    Any,
}

impl Selector {
    /// Whether the index treats this selector as a wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        match self {
            Selector::Positive(values) | Selector::Negative(values) => values.is_empty(),
            Selector::Any => true,
        }
    }

    /// The values named by this selector, empty for [`Selector::Any`].
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        match self {
            Selector::Positive(values) | Selector::Negative(values) => Some(values.iter()),
            Selector::Any => None,
        }
        .into_iter()
        .flatten()
    }

    /// Linear evaluation against an object's values for this attribute.
    ///
    /// `values` is `None` when the object lacks the attribute; that case is
    /// evaluated as the single wildcard value.
    #[must_use]
    pub fn admits(&self, values: Option<&BTreeSet<Value>>) -> bool {
        if self.is_wildcard() {
            return true;
        }
        let hits = |set: &BTreeSet<Value>| match values {
            Some(object_values) => object_values.iter().any(|v| set.contains(v)),
            None => set.contains(Value::WILDCARD),
        };
        match self {
            Selector::Positive(set) => hits(set),
            Selector::Negative(set) => !hits(set),
            Selector::Any => true,
        }
    }
}

fn collect<I, V>(values: I) -> BTreeSet<Value>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    values.into_iter().map(Into::into).collect()
}

/// A positive selector accepting any of `values`.
#[must_use]
pub fn one_of<I, V>(values: I) -> Selector
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Selector::Positive(collect(values))
}

/// A negative selector excluding all of `values`.
#[must_use]
pub fn none_of<I, V>(values: I) -> Selector
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Selector::Negative(collect(values))
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = |f: &mut fmt::Formatter<'_>, values: &BTreeSet<Value>| {
            let joined: Vec<&str> = values.iter().map(Value::as_str).collect();
            write!(f, "[{}]", joined.join(", "))
        };
        match self {
            Selector::Positive(values) => {
                write!(f, "in ")?;
                list(f, values)
            }
            Selector::Negative(values) => {
                write!(f, "not in ")?;
                list(f, values)
            }
            Selector::Any => write!(f, "any"),
        }
    }
}
