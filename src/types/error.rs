use std::fmt;

use thiserror::Error;

/// Errors that prevent an index from being built at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("duplicate attribute '{name}' in attribute order")]
    DuplicateAttribute { name: String },

    #[error("empty attribute name at position {position} in attribute order")]
    EmptyAttributeName { position: usize },
}

/// A problem with a single rule. Never fatal to the build; recorded as a
/// [`Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("malformed rule '{code}': {reason}")]
    MalformedRule { code: String, reason: String },

    #[error("rule '{code}' references unknown attribute '{attribute}'")]
    UnknownAttribute { code: String, attribute: String },
}

impl RuleError {
    /// The code of the offending rule.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            RuleError::MalformedRule { code, .. } | RuleError::UnknownAttribute { code, .. } => {
                code
            }
        }
    }
}

/// What the builder did with a rule that produced a [`RuleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The rule was left out of the index.
    Skipped,
    /// The offending part was ignored and the rule was inserted.
    Applied,
}

/// A per-rule build diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub error: RuleError,
    pub disposition: Disposition,
}

impl Diagnostic {
    pub(crate) fn skipped(error: RuleError) -> Self {
        Self {
            error,
            disposition: Disposition::Skipped,
        }
    }

    pub(crate) fn applied(error: RuleError) -> Self {
        Self {
            error,
            disposition: Disposition::Applied,
        }
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.disposition == Disposition::Skipped
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.disposition {
            Disposition::Skipped => write!(f, "{} (rule skipped)", self.error),
            Disposition::Applied => write!(f, "{} (ignored)", self.error),
        }
    }
}
