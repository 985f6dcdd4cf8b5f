//! Error types for response extraction

use thiserror::Error;

/// Number of characters of the failed candidate kept for diagnosis
const EXCERPT_CHARS: usize = 200;

/// Errors that can occur while extracting a structured value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Input was empty or whitespace-only; a caller bug, not a model failure
    #[error("empty response text")]
    EmptyInput,

    /// No strategy recovered a valid structured value
    ///
    /// Expected to happen occasionally given model unreliability; callers
    /// should log the raw response and treat this as recoverable.
    #[error("unparsable response: {excerpt}")]
    Unparsable {
        /// First ~200 characters of the candidate substring
        excerpt: String,
    },
}

impl ExtractError {
    /// Build an `Unparsable` error carrying a bounded excerpt of `candidate`
    pub(crate) fn unparsable(candidate: &str) -> Self {
        let excerpt: String = candidate.chars().take(EXCERPT_CHARS).collect();
        ExtractError::Unparsable { excerpt }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_is_bounded() {
        let long = "x".repeat(1000);
        match ExtractError::unparsable(&long) {
            ExtractError::Unparsable { excerpt } => {
                assert_eq!(excerpt.chars().count(), EXCERPT_CHARS)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        // Multibyte text must not panic on a byte-boundary slice
        let text = "値".repeat(300);
        match ExtractError::unparsable(&text) {
            ExtractError::Unparsable { excerpt } => {
                assert_eq!(excerpt.chars().count(), EXCERPT_CHARS)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_short_candidate_kept_whole() {
        match ExtractError::unparsable("nope") {
            ExtractError::Unparsable { excerpt } => assert_eq!(excerpt, "nope"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
