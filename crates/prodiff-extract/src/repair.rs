//! Truncation repair for mapping-with-array responses
//!
//! A response cut off at a token limit classically looks like an `"ideas"`
//! array that was opened but never closed. When the text contains one of the
//! known array keys and has more `[` than `]`, two repair passes try to
//! close the array after the last fully-formed element. This is the one
//! documented exception to the no-partial-results rule: complete elements
//! before the cut survive, the trailing fragment is dropped.

use serde_json::Value;
use tracing::debug;

/// Attempt to repair a truncated mapping, returning the parsed value on
/// success.
///
/// `text` must start at the value opener and keep its truncated tail.
pub(crate) fn repair_truncated(text: &str, array_keys: &[&str]) -> Option<Value> {
    let keyed = array_keys
        .iter()
        .any(|key| text.contains(&format!("\"{}\"", key)));
    if !keyed {
        return None;
    }

    let opens = text.matches('[').count();
    let closes = text.matches(']').count();
    if opens <= closes {
        return None;
    }

    // Pass A: cut at the end of the last complete element with a trailing
    // comma, then close the array and the outer mapping.
    if let Some(idx) = text.rfind("},") {
        let mended = format!("{}]}}", &text[..=idx]);
        if let Ok(value) = serde_json::from_str::<Value>(&mended) {
            debug!(cut = idx, "repaired truncated array at trailing comma");
            return Some(value);
        }
    }

    // Pass B: cut at the last bare object end instead.
    if let Some(idx) = text.rfind('}') {
        let mended = format!("{}]}}", &text[..=idx]);
        if let Ok(value) = serde_json::from_str::<Value>(&mended) {
            debug!(cut = idx, "repaired truncated array at object end");
            return Some(value);
        }
    }

    None
}
