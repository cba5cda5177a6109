use std::collections::{BTreeSet, HashMap};

use super::Value;

/// One node of a built index.
///
/// Leaves sit at depth equal to the attribute count and carry the codes of
/// every rule that terminates there. Every other node is [`Node::Internal`].
/// Each node exclusively owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(Leaf),
    Internal(Internal),
}

/// Terminal node carrying rule codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaf {
    pub(crate) codes: BTreeSet<String>,
}

/// Branching node for one attribute level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Internal {
    pub(crate) branches: HashMap<Value, Node>,
    pub(crate) wildcard: Option<Box<Node>>,
    pub(crate) negatives: Vec<NegativeBranch>,
}

/// A child reached only when the object carries none of `excluded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegativeBranch {
    pub(crate) excluded: BTreeSet<Value>,
    pub(crate) child: Node,
}

impl Node {
    /// An empty node of the right kind for `depth` in an index of `levels`
    /// attributes.
    pub(crate) fn for_depth(depth: usize, levels: usize) -> Self {
        if depth >= levels {
            Node::Leaf(Leaf::default())
        } else {
            Node::Internal(Internal::default())
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Codes terminating at this node; `None` for internal nodes.
    #[must_use]
    pub fn codes(&self) -> Option<&BTreeSet<String>> {
        match self {
            Node::Leaf(leaf) => Some(&leaf.codes),
            Node::Internal(_) => None,
        }
    }

    /// Number of nodes in the subtree rooted here, this node included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Internal(internal) => 1 + internal.children().map(Node::node_count).sum::<usize>(),
        }
    }
}

impl Leaf {
    #[must_use]
    pub fn codes(&self) -> &BTreeSet<String> {
        &self.codes
    }
}

impl Internal {
    /// The exact-match child for `value`.
    #[must_use]
    pub fn branch(&self, value: &str) -> Option<&Node> {
        self.branches.get(value)
    }

    /// Exact-match children, sorted by value.
    #[must_use]
    pub fn branches(&self) -> Vec<(&Value, &Node)> {
        let mut entries: Vec<(&Value, &Node)> = self.branches.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    #[must_use]
    pub fn wildcard(&self) -> Option<&Node> {
        self.wildcard.as_deref()
    }

    #[must_use]
    pub fn negatives(&self) -> &[NegativeBranch] {
        &self.negatives
    }

    /// All children: exact branches, then the wildcard, then negatives.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.branches
            .values()
            .chain(self.wildcard.as_deref())
            .chain(self.negatives.iter().map(|n| &n.child))
    }
}

impl NegativeBranch {
    #[must_use]
    pub fn excluded(&self) -> &BTreeSet<Value> {
        &self.excluded
    }

    #[must_use]
    pub fn child(&self) -> &Node {
        &self.child
    }

    /// Whether an object with `values` for this level may take the branch.
    /// `None` stands for a missing attribute.
    pub(crate) fn admits(&self, values: Option<&BTreeSet<Value>>) -> bool {
        match values {
            Some(values) => values.iter().all(|v| !self.excluded.contains(v)),
            None => !self.excluded.contains(Value::WILDCARD),
        }
    }
}
