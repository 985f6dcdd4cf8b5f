//! Prodiff Response Extractor
//!
//! Recovers a structured JSON value from the raw text of an LLM completion.
//!
//! # Overview
//!
//! Generative models are asked for JSON but routinely wrap it in prose,
//! markdown code fences, get truncated mid-array at a token limit, or emit
//! quasi-JSON with single-quoted strings. This crate locates and parses the
//! one structured value embedded in such output, tolerating that noise while
//! never fabricating data: the result is always what a parser produces for a
//! substring of the input (plus the documented truncation-repair exception).
//!
//! # Strategy order
//!
//! 1. Fenced-block extraction (first block wins, `json` tag preferred)
//! 2. Boundary detection: earlier of the first `{` / `[` picks mapping vs
//!    sequence; the span ends at the *last* occurrence of the matching
//!    closer. Anchoring on the last closer instead of counting depth is
//!    deliberate: truncated responses have malformed tails far more often
//!    than malformed heads, so this maximizes recovered content
//! 3. Strict JSON parse of the span
//! 4. Truncation repair when a known array key (`"ideas"` by default) was
//!    opened but never closed
//! 5. Permissive literal parse (single quotes, trailing commas,
//!    Python-style `True`/`False`/`None`)
//!
//! # Example
//!
//! ```
//! let raw = "Here you go:\n```json\n{\"price\": \"¥2000\"}\n```\nEnjoy!";
//! let value = prodiff_extract::extract(raw).unwrap();
//! assert_eq!(value["price"], "¥2000");
//! ```
//!
//! Extraction is a pure function of its input: no state, no I/O, safe to
//! call concurrently.

#![warn(missing_docs)]

mod error;
mod extract;
mod fence;
mod relaxed;
mod repair;
mod span;

pub use error::ExtractError;
pub use extract::{extract, extract_with_array_keys, DEFAULT_ARRAY_KEYS};
