use std::collections::hash_map;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Codes matched per object, produced by
/// [`Index::match_all()`](super::Index::match_all).
///
/// Iteration order over objects is unspecified; codes per object are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct MatchResult {
    matches: HashMap<String, BTreeSet<String>>,
}

impl MatchResult {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            matches: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, id: String, codes: BTreeSet<String>) {
        self.matches.insert(id, codes);
    }

    /// Codes matched by the object with `id`, or `None` if no such object was
    /// part of the batch.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.matches.get(id)
    }

    /// Whether the object with `id` matched `code`.
    #[must_use]
    pub fn contains(&self, id: &str, code: &str) -> bool {
        self.matches
            .get(id)
            .is_some_and(|codes| codes.contains(code))
    }

    /// Number of objects in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.matches.iter().map(|(id, codes)| (id.as_str(), codes))
    }

    #[must_use]
    pub fn into_inner(self) -> HashMap<String, BTreeSet<String>> {
        self.matches
    }
}

impl IntoIterator for MatchResult {
    type Item = (String, BTreeSet<String>);
    type IntoIter = hash_map::IntoIter<String, BTreeSet<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&String> = self.matches.keys().collect();
        ids.sort();
        for (i, id) in ids.into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let codes: Vec<&str> = self.matches[id].iter().map(String::as_str).collect();
            write!(f, "{id}: [{}]", codes.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn insert_and_get() {
        let mut result = MatchResult::default();
        result.insert("offer_123".into(), codes(&["store_1", "store_2"]));
        assert_eq!(result.len(), 1);
        assert_eq!(result.get("offer_123"), Some(&codes(&["store_1", "store_2"])));
        assert!(result.contains("offer_123", "store_2"));
        assert!(!result.contains("offer_123", "store_3"));
        assert!(!result.contains("offer_456", "store_1"));
    }

    #[test]
    fn later_insert_replaces() {
        let mut result = MatchResult::default();
        result.insert("o".into(), codes(&["a"]));
        result.insert("o".into(), codes(&["b"]));
        assert_eq!(result.get("o"), Some(&codes(&["b"])));
    }

    #[test]
    fn display_sorted_by_id() {
        let mut result = MatchResult::default();
        result.insert("b".into(), codes(&["y", "x"]));
        result.insert("a".into(), codes(&[]));
        assert_eq!(result.to_string(), "a: []\nb: [x, y]");
    }
}
