mod attributes;
mod config;
mod error;
mod index;
mod match_report;
mod match_result;
mod node;
mod object;
mod rule;
mod selector;
mod value;

pub use attributes::AttributeOrder;
pub use config::{BuildConfig, UnknownAttributePolicy};
pub use error::{BuildError, Diagnostic, Disposition, RuleError};
pub use index::{Index, IndexBuilder};
pub use match_report::{Exclusion, MatchReport};
pub use match_result::MatchResult;
pub use node::{Internal, Leaf, NegativeBranch, Node};
pub use object::Object;
pub use rule::Rule;
pub use selector::{none_of, one_of, Selector};
pub use value::Value;
