/// How the builder treats a selector on an attribute that is not part of the
/// attribute order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UnknownAttributePolicy {
    /// Drop the selector and insert the rule as if the attribute were
    /// unconstrained. A diagnostic is still recorded.
    #[default]
    Ignore,
    /// Leave the whole rule out of the index.
    Reject,
}

/// Build-time policy for an index.
///
/// ```
/// use ruletree::{BuildConfig, UnknownAttributePolicy};
///
/// let config = BuildConfig::default().unknown_attributes(UnknownAttributePolicy::Reject);
/// assert_eq!(config.unknown_attributes, UnknownAttributePolicy::Reject);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuildConfig {
    pub unknown_attributes: UnknownAttributePolicy,
}

impl BuildConfig {
    #[must_use]
    pub fn unknown_attributes(mut self, policy: UnknownAttributePolicy) -> Self {
        self.unknown_attributes = policy;
        self
    }
}
