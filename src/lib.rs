//! Attribute-indexed rule classification.
//!
//! Rules constrain an ordered list of attributes with positive sets, negative
//! sets, or nothing at all. [`IndexBuilder`] compiles them into a layered tree
//! with one level per attribute, and [`Index::matches`] walks that tree once
//! per object instead of scanning every rule.
//!
//! ```
//! use ruletree::{Index, Object};
//!
//! let index = Index::from_dsl(
//!     r#"
//! attributes country, brand
//!
//! rule store_1: country in [US], brand in [Nike]
//! rule store_2: country in [US]
//! rule store_3: brand not in [Adidas, Puma]
//! "#,
//! )
//! .unwrap();
//!
//! let offer = Object::new("offer_456").set("country", "UK").set("brand", "Reebok");
//! assert_eq!(index.matches(&offer).into_iter().collect::<Vec<_>>(), ["store_3"]);
//! ```

mod build;
mod error;
#[cfg(feature = "serde")]
pub mod json;
mod matcher;
pub mod parse;
#[cfg(feature = "binary-cache")]
pub mod serial;
mod types;

pub use error::RuletreeError;
pub use types::{
    none_of, one_of, AttributeOrder, BuildConfig, BuildError, Diagnostic, Disposition,
    Exclusion, Index, IndexBuilder, Internal, Leaf, MatchReport, MatchResult, NegativeBranch,
    Node, Object, Rule, RuleError, Selector, UnknownAttributePolicy, Value,
};
