use thiserror::Error;

use crate::parse::ParseError;
use crate::BuildError;

/// Unified error type covering parsing, building, and I/O.
///
/// Returned by convenience constructors like
/// [`Index::from_dsl()`](crate::Index::from_dsl) and
/// [`Index::from_file()`](crate::Index::from_file).
#[derive(Debug, Error)]
pub enum RuletreeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}
