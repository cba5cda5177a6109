use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroUsize;

use super::attributes::AttributeOrder;
use super::config::{BuildConfig, UnknownAttributePolicy};
use super::error::{BuildError, Diagnostic, RuleError};
use super::match_report::MatchReport;
use super::match_result::MatchResult;
use super::node::Node;
use super::object::Object;
use super::rule::Rule;

/// Builder for constructing an [`Index`].
///
/// Rules are defined via closures or added as finished [`Rule`] records, then
/// compiled into an immutable, thread-safe index.
///
/// # Example
///
/// ```
/// use ruletree::{IndexBuilder, Object};
///
/// let index = IndexBuilder::new(["country", "brand"])
///     .rule("store_1", |r| r.one_of("country", ["US"]).one_of("brand", ["Nike"]))
///     .rule("store_2", |r| r.one_of("country", ["US"]))
///     .rule("store_3", |r| r.none_of("brand", ["Adidas", "Puma"]))
///     .build()
///     .unwrap();
///
/// let offer = Object::new("offer_123").set("country", "US").set("brand", "Nike");
/// let codes: Vec<&str> = index.matches(&offer).into_iter().collect();
/// assert_eq!(codes, ["store_1", "store_2", "store_3"]);
/// ```
#[derive(Debug, Default)]
pub struct IndexBuilder {
    attributes: Vec<String>,
    records: Vec<Result<Rule, RuleError>>,
    config: BuildConfig,
}

impl IndexBuilder {
    /// Start a builder over the given attribute order.
    #[must_use]
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Define a rule. The closure receives an empty rule with the given code
    /// and returns it with its selectors set.
    #[must_use]
    pub fn rule(mut self, code: &str, f: impl FnOnce(Rule) -> Rule) -> Self {
        self.records.push(Ok(f(Rule::new(code))));
        self
    }

    /// Add a finished rule.
    #[must_use]
    pub fn add(mut self, rule: Rule) -> Self {
        self.records.push(Ok(rule));
        self
    }

    /// Add finished rules in order.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.records.extend(rules.into_iter().map(Ok));
        self
    }

    /// Add records from a rule source that may have failed to decode some of
    /// them. Failed records are reported as skipped diagnostics in order.
    #[must_use]
    pub fn records(mut self, records: impl IntoIterator<Item = Result<Rule, RuleError>>) -> Self {
        self.records.extend(records);
        self
    }

    #[must_use]
    pub fn config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn unknown_attributes(mut self, policy: UnknownAttributePolicy) -> Self {
        self.config.unknown_attributes = policy;
        self
    }

    /// Compile the rules into an immutable `Index`.
    ///
    /// Problems with individual rules never fail the build; they are
    /// available afterwards from [`Index::diagnostics()`].
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the attribute order is invalid.
    pub fn build(self) -> Result<Index, BuildError> {
        let attributes = AttributeOrder::new(self.attributes)?;
        Ok(crate::build::build(attributes, self.records, self.config))
    }
}

/// A compiled, immutable rule index. Thread-safe and designed to live behind
/// `Arc` or be shared by reference across scoped threads.
#[derive(Debug)]
pub struct Index {
    pub(crate) attributes: AttributeOrder,
    pub(crate) root: Node,
    pub(crate) rules: Vec<Rule>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) config: BuildConfig,
}

impl Index {
    /// Codes of every rule satisfied by `object`, deduplicated and sorted.
    #[must_use]
    pub fn matches(&self, object: &Object) -> BTreeSet<&str> {
        crate::matcher::matches(&self.root, &self.attributes, object)
    }

    /// Match with diagnostics: visited node count, excluding negative
    /// branches, and timing.
    pub fn match_detailed(&self, object: &Object) -> MatchReport {
        crate::matcher::match_detailed(&self.root, &self.attributes, object)
    }

    /// Match every object and collect the codes per object identifier.
    ///
    /// If two objects share an identifier, the later one's codes win.
    pub fn match_all<'o>(&self, objects: impl IntoIterator<Item = &'o Object>) -> MatchResult {
        crate::matcher::match_all(self, objects)
    }

    /// Like [`match_all()`](Self::match_all), splitting `objects` across up to
    /// `threads` scoped worker threads that share this index.
    pub fn match_all_parallel(&self, objects: &[Object], threads: NonZeroUsize) -> MatchResult {
        crate::matcher::match_all_parallel(self, objects, threads)
    }

    /// Parse a rule DSL string and build an `Index` with the default config.
    ///
    /// # Errors
    ///
    /// Returns [`RuletreeError`](crate::RuletreeError) on parse or build failure.
    pub fn from_dsl(input: &str) -> Result<Self, crate::RuletreeError> {
        Self::from_dsl_with_config(input, BuildConfig::default())
    }

    /// Parse a rule DSL string and build an `Index` with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RuletreeError`](crate::RuletreeError) on parse or build failure.
    pub fn from_dsl_with_config(
        input: &str,
        config: BuildConfig,
    ) -> Result<Self, crate::RuletreeError> {
        let parsed = crate::parse::parse(input)?;
        let index = IndexBuilder::new(parsed.attributes)
            .rules(parsed.rules)
            .config(config)
            .build()?;
        Ok(index)
    }

    /// Read a rule DSL file and build an `Index`.
    ///
    /// # Errors
    ///
    /// Returns [`RuletreeError`](crate::RuletreeError) on I/O, parse, or build failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::RuletreeError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_dsl(&input)
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeOrder {
        &self.attributes
    }

    /// The root of the index tree, for inspection.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The rules that made it into the index, in insertion order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Per-rule problems found while building, in rule order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn config(&self) -> BuildConfig {
        self.config
    }

    /// Total number of nodes in the index tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}

#[cfg(feature = "binary-cache")]
impl Index {
    /// Serialize the rule source behind this index to a byte vector.
    ///
    /// Only the attribute order, build config and accepted rules are written;
    /// the tree is rebuilt on load. The optional `source_text` is hashed
    /// (BLAKE3) and embedded so callers can detect a stale cache.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) if encoding fails.
    pub fn to_bytes(
        &self,
        source_text: Option<&str>,
    ) -> Result<Vec<u8>, crate::serial::SerializeError> {
        crate::serial::encode(self, source_text)
    }

    /// Rebuild an index from bytes previously produced by
    /// [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// format, integrity, or validation failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::serial::DeserializeError> {
        crate::serial::decode(bytes)
    }

    /// Serialize the rule source and write it to a file.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) on
    /// encoding or I/O failure.
    pub fn to_binary_file(
        &self,
        path: impl AsRef<std::path::Path>,
        source_text: Option<&str>,
    ) -> Result<(), crate::serial::SerializeError> {
        let bytes = self.to_bytes(source_text)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a file written by [`to_binary_file`](Self::to_binary_file) and
    /// rebuild the index.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// I/O, format, integrity, or validation failure.
    pub fn from_binary_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, crate::serial::DeserializeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Index({} rules, {} attributes, {} nodes, {} diagnostics)",
            self.rules.len(),
            self.attributes.len(),
            self.node_count(),
            self.diagnostics.len(),
        )
    }
}
