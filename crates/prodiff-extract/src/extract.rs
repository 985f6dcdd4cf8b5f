//! The ordered extraction pipeline

use crate::error::ExtractError;
use crate::{fence, relaxed, repair, span};
use serde_json::Value;
use tracing::debug;

/// Array keys the truncation repair looks for by default
///
/// The idea-generation flow is the caller that hits token-limit truncation
/// in practice, so its top-level key is the built-in default.
pub const DEFAULT_ARRAY_KEYS: &[&str] = &["ideas"];

/// Extract the structured value embedded in raw model output
///
/// Equivalent to [`extract_with_array_keys`] with [`DEFAULT_ARRAY_KEYS`].
///
/// # Errors
///
/// - [`ExtractError::EmptyInput`] when `text` is empty or whitespace-only
/// - [`ExtractError::Unparsable`] when no strategy recovers a value
pub fn extract(text: &str) -> Result<Value, ExtractError> {
    extract_with_array_keys(text, DEFAULT_ARRAY_KEYS)
}

/// Extract with a caller-specific set of repairable top-level array keys
///
/// Strategies run in order, first success wins: fenced-block extraction,
/// boundary detection, strict parse, truncation repair (only when one of
/// `array_keys` appears and an array was left unclosed), permissive literal
/// parse. See the crate docs for the full policy.
pub fn extract_with_array_keys(text: &str, array_keys: &[&str]) -> Result<Value, ExtractError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::EmptyInput);
    }

    // Strategy 1: a closed fenced block narrows the candidate
    let candidate = fence::fenced_block(trimmed).unwrap_or(trimmed);

    // Strategy 2: locate the value span
    let Some(span) = span::locate(candidate) else {
        debug!("no value opener in candidate");
        return Err(ExtractError::unparsable(candidate));
    };

    // Strategy 3: strict parse
    if let Ok(value) = serde_json::from_str::<Value>(span.candidate()) {
        return Ok(value);
    }

    // Strategy 4: truncation repair on the head slice, which still carries
    // the cut-off tail the repair anchors on
    if let Some(value) = repair::repair_truncated(span.head, array_keys) {
        debug!("recovered value via truncation repair");
        return Ok(value);
    }

    // Strategy 5: permissive literal parse
    if let Ok(value) = relaxed::parse_relaxed(span.candidate()) {
        debug!("recovered value via relaxed literal parse");
        return Ok(value);
    }

    Err(ExtractError::unparsable(span.candidate()))
}
