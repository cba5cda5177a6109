use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use super::Value;

/// A negative branch the object was kept out of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    /// The attribute whose level the branch sits on.
    pub attribute: String,
    /// The branch's excluded values that the object carried.
    pub hit: BTreeSet<Value>,
}

/// Detailed match report returned by
/// [`Index::match_detailed()`](super::Index::match_detailed).
///
/// Contains the matched codes, how many index nodes the walk visited, which
/// negative branches excluded the object, and the wall-clock duration.
#[derive(Debug, Clone)]
#[must_use]
pub struct MatchReport {
    object_id: String,
    codes: BTreeSet<String>,
    visited: usize,
    exclusions: Vec<Exclusion>,
    duration: Duration,
}

impl MatchReport {
    pub(crate) fn new(
        object_id: String,
        codes: BTreeSet<String>,
        visited: usize,
        exclusions: Vec<Exclusion>,
        duration: Duration,
    ) -> Self {
        Self {
            object_id,
            codes,
            visited,
            exclusions,
            duration,
        }
    }

    #[must_use]
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    /// The matched codes, same as [`Index::matches()`](super::Index::matches).
    #[must_use]
    pub fn codes(&self) -> &BTreeSet<String> {
        &self.codes
    }

    /// Number of index nodes visited, root and leaves included.
    #[must_use]
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Negative branches that excluded the object, in walk order.
    #[must_use]
    pub fn exclusions(&self) -> &[Exclusion] {
        &self.exclusions
    }

    /// Wall-clock duration of the walk.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.codes.iter().map(String::as_str).collect();
        write!(f, "{}: [{}]", self.object_id, codes.join(", "))?;
        write!(f, ", visited: {}", self.visited)?;
        if !self.exclusions.is_empty() {
            let excluded: Vec<&str> = self
                .exclusions
                .iter()
                .map(|e| e.attribute.as_str())
                .collect();
            write!(f, ", excluded on: [{}]", excluded.join(", "))?;
        }
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
