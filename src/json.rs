//! JSON rule sources, object sources, and a diagnostic dump of the index.
//!
//! ## Rule documents
//!
//! ```json
//! {
//!   "attributes": ["country", "brand"],
//!   "config": { "unknown_attributes": "ignore" },
//!   "rules": [
//!     { "code": "store_1", "attributes": { "country": ["US"], "brand": ["Nike"] } },
//!     { "code": "store_3", "attributes": { "brand": { "not_in": ["Adidas", "Puma"] } } }
//!   ]
//! }
//! ```
//!
//! A selector is `null` or `"*"` (unconstrained), a list of values, or an
//! object with a single `in` or `not_in` list. Values may be strings, numbers
//! or booleans and are compared by their canonical string form. Any other
//! selector shape makes that one rule malformed; it is reported through
//! [`Index::diagnostics()`] and the rest of the document still builds.
//!
//! ## Object documents
//!
//! ```json
//! [{ "id": "offer_123", "attributes": { "country": ["US"], "brand": "Nike" } }]
//! ```
//!
//! `"ID"` is accepted in place of `"id"`. An attribute may hold one value or a
//! list of values.

use std::collections::BTreeSet;

use serde::de::Error as _;
use serde::Deserialize;
use serde_json::{json, Map, Value as Json};

use crate::{
    BuildConfig, Index, IndexBuilder, Node, Object, Rule, RuleError, RuletreeError, Selector,
    Value,
};

#[derive(Debug, Deserialize)]
struct RawRuleDocument {
    attributes: Vec<String>,
    #[serde(default)]
    config: BuildConfig,
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    code: String,
    #[serde(default)]
    attributes: Map<String, Json>,
}

#[derive(Debug, Deserialize)]
struct RawObject {
    #[serde(alias = "ID")]
    id: Json,
    #[serde(default)]
    attributes: Map<String, Json>,
}

fn scalar(value: &Json) -> Option<Value> {
    match value {
        Json::String(s) => Some(Value::from(s.as_str())),
        Json::Number(n) => n
            .as_i64()
            .map(Value::from)
            .or_else(|| n.as_u64().map(Value::from))
            .or_else(|| n.as_f64().map(Value::from)),
        Json::Bool(b) => Some(Value::from(*b)),
        Json::Null | Json::Array(_) | Json::Object(_) => None,
    }
}

fn value_list(values: &[Json]) -> Option<BTreeSet<Value>> {
    values.iter().map(scalar).collect()
}

fn selector(value: &Json) -> Result<Selector, String> {
    match value {
        Json::Null => Ok(Selector::Any),
        Json::String(s) if s == Value::WILDCARD => Ok(Selector::Any),
        Json::Array(values) => value_list(values)
            .map(Selector::Positive)
            .ok_or_else(|| "value lists may only hold strings, numbers or booleans".to_owned()),
        Json::Object(map) if map.len() == 1 => {
            let (key, inner) = map.iter().next().ok_or("empty selector object")?;
            let values = match inner {
                Json::Array(values) => value_list(values),
                _ => None,
            }
            .ok_or_else(|| format!("'{key}' must hold a list of scalar values"))?;
            match key.as_str() {
                "in" => Ok(Selector::Positive(values)),
                "not_in" => Ok(Selector::Negative(values)),
                other => Err(format!("unknown selector operator '{other}'")),
            }
        }
        other => Err(format!(
            "expected null, \"*\", a list, or {{\"in\"|\"not_in\": [...]}}, got {other}"
        )),
    }
}

fn rule_record(raw: RawRule) -> Result<Rule, RuleError> {
    let mut rule = Rule::new(raw.code);
    for (attribute, value) in &raw.attributes {
        let sel = selector(value).map_err(|reason| RuleError::MalformedRule {
            code: rule.code.clone(),
            reason: format!("selector on '{attribute}': {reason}"),
        })?;
        rule = rule.with(attribute, sel);
    }
    Ok(rule)
}

/// Decode a JSON array of rule records.
///
/// Records whose selectors are malformed come back as `Err` so they can be
/// handed to [`IndexBuilder::records()`] and reported as diagnostics.
///
/// # Errors
///
/// Returns a JSON error if the input is not an array of
/// `{"code": ..., "attributes": {...}}` records.
pub fn rules_from_str(input: &str) -> Result<Vec<Result<Rule, RuleError>>, serde_json::Error> {
    let raw: Vec<RawRule> = serde_json::from_str(input)?;
    Ok(raw.into_iter().map(rule_record).collect())
}

/// Decode a JSON array of objects to classify.
///
/// # Errors
///
/// Returns a JSON error if a record is missing its id or carries an
/// attribute value that is not a scalar or a list of scalars.
pub fn objects_from_str(input: &str) -> Result<Vec<Object>, serde_json::Error> {
    let raw: Vec<RawObject> = serde_json::from_str(input)?;
    raw.into_iter().map(object_record).collect()
}

fn object_record(raw: RawObject) -> Result<Object, serde_json::Error> {
    let id = scalar(&raw.id)
        .ok_or_else(|| serde_json::Error::custom("object id must be a string or number"))?;
    let mut object = Object::new(id.as_str());
    for (attribute, value) in &raw.attributes {
        let values = match value {
            Json::Array(values) => value_list(values),
            Json::Null => Some(BTreeSet::new()),
            single => scalar(single).map(|v| [v].into_iter().collect()),
        }
        .ok_or_else(|| {
            serde_json::Error::custom(format!(
                "object '{id}': attribute '{attribute}' must be a scalar or a list of scalars"
            ))
        })?;
        object = object.set_all(attribute, values);
    }
    Ok(object)
}

/// Build an index from a JSON rule document.
///
/// # Errors
///
/// Returns [`RuletreeError::Json`] for undecodable documents and
/// [`RuletreeError::Build`] for an invalid attribute order.
pub fn index_from_str(input: &str) -> Result<Index, RuletreeError> {
    let doc: RawRuleDocument = serde_json::from_str(input)?;
    let index = IndexBuilder::new(doc.attributes)
        .config(doc.config)
        .records(doc.rules.into_iter().map(rule_record))
        .build()?;
    Ok(index)
}

fn dump_node(node: &Node, index: &Index, depth: usize) -> Json {
    match node {
        Node::Leaf(leaf) => json!({ "codes": leaf.codes() }),
        Node::Internal(internal) => {
            let mut out = Map::new();
            if let Some(name) = index.attributes().name_at(depth) {
                out.insert("attribute".to_owned(), json!(name));
            }
            if !internal.branches().is_empty() {
                let branches: Map<String, Json> = internal
                    .branches()
                    .into_iter()
                    .map(|(value, child)| (value.to_string(), dump_node(child, index, depth + 1)))
                    .collect();
                out.insert("branches".to_owned(), Json::Object(branches));
            }
            if let Some(child) = internal.wildcard() {
                out.insert("wildcard".to_owned(), dump_node(child, index, depth + 1));
            }
            if !internal.negatives().is_empty() {
                let negatives: Vec<Json> = internal
                    .negatives()
                    .iter()
                    .map(|n| {
                        json!({
                            "excluded": n.excluded(),
                            "child": dump_node(n.child(), index, depth + 1),
                        })
                    })
                    .collect();
                out.insert("negatives".to_owned(), Json::Array(negatives));
            }
            Json::Object(out)
        }
    }
}

impl Index {
    /// A JSON rendering of the index tree, for diagnostics.
    #[must_use]
    pub fn to_json(&self) -> Json {
        dump_node(self.root(), self, 0)
    }

    /// [`to_json()`](Self::to_json), pretty-printed.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if rendering fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_json())
    }
}
