use crate::error::TimelineError;
use crate::event::TimelineEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

const CHAIN_HASH_FIELD: &str = "chain_hash";
const PREV_HASH_FIELD: &str = "prev_hash";

/// `sha256(prev_hash || payload)`, hex encoded.
pub fn chain_hash(prev_hash: &str, payload: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prev_hash.as_bytes());
    hasher.update(payload);
    hex::encode(hasher.finalize())
}

/// Canonical bytes of an event object: compact, keys sorted, no `chain_hash`.
///
/// `serde_json::Map` is ordered by key, so serializing a `Value` sorts
/// at every nesting level.
fn canonical_payload(mut value: Value) -> Result<Vec<u8>, TimelineError> {
    if let Value::Object(map) = &mut value {
        map.remove(CHAIN_HASH_FIELD);
    }
    Ok(serde_json::to_vec(&value)?)
}

pub(crate) fn hash_event(event: &TimelineEvent) -> Result<String, TimelineError> {
    let payload = canonical_payload(serde_json::to_value(event)?)?;
    Ok(chain_hash(&event.prev_hash, &payload))
}

/// Outcome of walking a stored chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainVerification {
    pub valid: bool,
    pub total_entries: usize,
    pub verified_entries: usize,
    pub first_invalid_index: Option<usize>,
    pub error_message: Option<String>,
}

impl ChainVerification {
    fn broken(total: usize, index: usize, message: String) -> Self {
        Self {
            valid: false,
            total_entries: total,
            verified_entries: index,
            first_invalid_index: Some(index),
            error_message: Some(message),
        }
    }
}

/// Verify raw log lines (blank lines already removed).
///
/// Each line's hash is recomputed from the stored JSON itself rather than a
/// re-serialized struct, so fields unknown to this version are covered too.
pub fn verify_lines<S: AsRef<str>>(lines: &[S]) -> ChainVerification {
    let total = lines.len();
    let mut expected_prev = String::new();

    for (i, line) in lines.iter().enumerate() {
        let value: Value = match serde_json::from_str(line.as_ref()) {
            Ok(value) => value,
            Err(e) => return ChainVerification::broken(total, i, format!("event {i} is not valid JSON: {e}")),
        };

        let stored_hash = value
            .get(CHAIN_HASH_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let prev_hash = value
            .get(PREV_HASH_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if prev_hash != expected_prev {
            return ChainVerification::broken(
                total,
                i,
                format!("event {i} has broken chain link (expected prev: {expected_prev:?}, got: {prev_hash:?})"),
            );
        }

        let recomputed = match canonical_payload(value) {
            Ok(payload) => chain_hash(&prev_hash, &payload),
            Err(e) => return ChainVerification::broken(total, i, e.to_string()),
        };
        if recomputed != stored_hash {
            return ChainVerification::broken(total, i, format!("event {i} has invalid hash"));
        }

        expected_prev = stored_hash;
    }

    ChainVerification {
        valid: true,
        total_entries: total,
        verified_entries: total,
        first_invalid_index: None,
        error_message: None,
    }
}
