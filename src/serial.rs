//! Binary cache of an index's rule source.
//!
//! The cache stores what the index was built from (attribute order, build
//! config, accepted rules) rather than the tree itself, and loading rebuilds
//! the tree through [`IndexBuilder`]. The format is a 32-byte fixed header
//! followed by a bincode-encoded payload.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"RTRE"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! The format version must match exactly. The engine version is
//! informational only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Index, IndexBuilder, Rule, Selector, UnknownAttributePolicy, Value};

const MAGIC: &[u8; 4] = b"RTRE";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

/// Errors that can occur when writing an [`Index`] cache.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode index source: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("I/O error during serialization: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when loading an [`Index`] cache.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a ruletree binary: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("I/O error during deserialization: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedIndex {
    metadata: IndexMetadata,
    attributes: Vec<String>,
    policy: SerializedPolicy,
    rules: Vec<SerializedRule>,
}

#[derive(Debug, Serialize, Deserialize)]
struct IndexMetadata {
    rule_count: usize,
    attribute_count: usize,
    source_digest: Option<[u8; 32]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum SerializedPolicy {
    Ignore,
    Reject,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedRule {
    code: String,
    selectors: Vec<(String, SerializedSelector)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum SerializedSelector {
    Positive(Vec<String>),
    Negative(Vec<String>),
    Any,
}

fn serialize_policy(policy: UnknownAttributePolicy) -> SerializedPolicy {
    match policy {
        UnknownAttributePolicy::Ignore => SerializedPolicy::Ignore,
        UnknownAttributePolicy::Reject => SerializedPolicy::Reject,
    }
}

fn deserialize_policy(policy: SerializedPolicy) -> UnknownAttributePolicy {
    match policy {
        SerializedPolicy::Ignore => UnknownAttributePolicy::Ignore,
        SerializedPolicy::Reject => UnknownAttributePolicy::Reject,
    }
}

fn serialize_selector(selector: &Selector) -> SerializedSelector {
    let strings = |values: &std::collections::BTreeSet<Value>| {
        values.iter().map(|v| v.as_str().to_owned()).collect()
    };
    match selector {
        Selector::Positive(values) => SerializedSelector::Positive(strings(values)),
        Selector::Negative(values) => SerializedSelector::Negative(strings(values)),
        Selector::Any => SerializedSelector::Any,
    }
}

fn deserialize_selector(selector: SerializedSelector) -> Selector {
    match selector {
        SerializedSelector::Positive(values) => {
            Selector::Positive(values.into_iter().map(Value::from).collect())
        }
        SerializedSelector::Negative(values) => {
            Selector::Negative(values.into_iter().map(Value::from).collect())
        }
        SerializedSelector::Any => Selector::Any,
    }
}

fn index_to_serialized(index: &Index, source_text: Option<&str>) -> SerializedIndex {
    let source_digest = source_text.map(|s| *blake3::hash(s.as_bytes()).as_bytes());

    let rules: Vec<SerializedRule> = index
        .rules()
        .iter()
        .map(|rule| SerializedRule {
            code: rule.code.clone(),
            selectors: rule
                .selectors
                .iter()
                .map(|(name, selector)| (name.clone(), serialize_selector(selector)))
                .collect(),
        })
        .collect();

    SerializedIndex {
        metadata: IndexMetadata {
            rule_count: rules.len(),
            attribute_count: index.attributes().len(),
            source_digest,
        },
        attributes: index.attributes().names().to_vec(),
        policy: serialize_policy(index.config().unknown_attributes),
        rules,
    }
}

fn serialized_to_index(ser: SerializedIndex) -> Result<Index, DeserializeError> {
    validate(&ser)?;

    let expected_rules = ser.rules.len();
    let rules = ser.rules.into_iter().map(|sr| Rule {
        code: sr.code,
        selectors: sr
            .selectors
            .into_iter()
            .map(|(name, selector)| (name, deserialize_selector(selector)))
            .collect(),
    });

    let index = IndexBuilder::new(ser.attributes)
        .unknown_attributes(deserialize_policy(ser.policy))
        .rules(rules)
        .build()
        .map_err(|e| DeserializeError::Validation(e.to_string()))?;

    // Every cached rule was accepted when the cache was written.
    if index.rules().len() != expected_rules {
        return Err(DeserializeError::Validation(format!(
            "{} of {} cached rules were rejected on rebuild",
            expected_rules - index.rules().len(),
            expected_rules
        )));
    }

    Ok(index)
}

fn validate(ser: &SerializedIndex) -> Result<(), DeserializeError> {
    if ser.metadata.rule_count != ser.rules.len() {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} rules but payload has {}",
            ser.metadata.rule_count,
            ser.rules.len()
        )));
    }
    if ser.metadata.attribute_count != ser.attributes.len() {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} attributes but payload has {}",
            ser.metadata.attribute_count,
            ser.attributes.len()
        )));
    }

    for rule in &ser.rules {
        for window in rule.selectors.windows(2) {
            if window[0].0 >= window[1].0 {
                return Err(DeserializeError::Validation(format!(
                    "rule '{}' has unsorted or repeated selector '{}'",
                    rule.code, window[1].0
                )));
            }
        }
    }

    Ok(())
}

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) {
    let hash = blake3::hash(payload);
    let hash_bytes = hash.as_bytes();

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags
    #[allow(clippy::cast_possible_truncation)] // rule sources stay far below 4 GiB
    let payload_len = payload.len() as u32;
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash_bytes[..16]);
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }

    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

pub(crate) fn encode(index: &Index, source_text: Option<&str>) -> Result<Vec<u8>, SerializeError> {
    let serialized = index_to_serialized(index, source_text);
    let payload = bincode::serde::encode_to_vec(&serialized, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload);
    buf.extend_from_slice(&payload);
    Ok(buf)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Index, DeserializeError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;

    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_end = HEADER_SIZE + payload_len as usize;
    if bytes.len() < payload_end {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[HEADER_SIZE..payload_end];

    if blake3::hash(payload).as_bytes()[..16] != stored_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (serialized, _): (SerializedIndex, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;

    serialized_to_index(serialized)
}

/// The BLAKE3 digest of the source text embedded by
/// [`Index::to_bytes`], if one was given.
///
/// Compare against `blake3::hash(current_source)` to tell whether a cache is
/// stale before paying for the rebuild.
///
/// # Errors
///
/// Returns [`DeserializeError`] if the header or payload is unreadable.
pub fn source_digest(bytes: &[u8]) -> Result<Option<[u8; 32]>, DeserializeError> {
    let (format_version, payload_len, _) = read_header(bytes)?;
    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }
    let payload = bytes
        .get(HEADER_SIZE..HEADER_SIZE + payload_len as usize)
        .ok_or(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        })?;
    let (serialized, _): (SerializedIndex, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    Ok(serialized.metadata.source_digest)
}
