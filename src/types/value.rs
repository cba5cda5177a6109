use std::borrow::Borrow;
use std::fmt;

/// An attribute value, compared by its canonical string form.
///
/// Numbers and booleans are converted to their `Display` form on
/// construction, so `Value::from(42_i64)` and `Value::from("42")` are equal.
/// The string `"*"` is reserved as the wildcard sentinel; see
/// [`Value::WILDCARD`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Value(String);

impl Value {
    /// The reserved wildcard sentinel.
    pub const WILDCARD: &'static str = "*";

    /// The canonical string form of this value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this value collides with the reserved wildcard sentinel.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.0 == Self::WILDCARD
    }

    pub(crate) fn wildcard() -> Self {
        Value(Self::WILDCARD.to_owned())
    }
}

impl Borrow<str> for Value {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value(v.clone())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value(v.to_string())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value(v.to_string())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value(v.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
