//! Boundary detection for the structured value inside a candidate
//!
//! Whichever of `{` / `[` occurs first decides whether the top-level value
//! is a mapping or a sequence. The closing bound is the *last* occurrence of
//! the matching closer, not a depth-counted match: truncated responses have
//! malformed tails far more often than malformed heads, so anchoring on the
//! last closer maximizes recovered content. Braces inside string literals
//! can therefore confuse the span; the strict parse downstream is the
//! authority on correctness, this is only a best-effort slice.

/// The detected value span within a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span<'a> {
    /// From the first opener to the end of the candidate; truncation repair
    /// works on this so a trailing `},` from a cut-off array survives
    pub head: &'a str,

    /// From the first opener to the last matching closer, inclusive; absent
    /// when the candidate contains no closer at all
    pub bounded: Option<&'a str>,
}

impl<'a> Span<'a> {
    /// The slice parse attempts run against
    pub fn candidate(&self) -> &'a str {
        self.bounded.unwrap_or(self.head)
    }
}

/// Locate the value span, or `None` when the candidate has no opener
pub(crate) fn locate(text: &str) -> Option<Span<'_>> {
    let (start, closer) = match (text.find('{'), text.find('[')) {
        (Some(obj), Some(arr)) if obj < arr => (obj, '}'),
        (Some(_), Some(arr)) => (arr, ']'),
        (Some(obj), None) => (obj, '}'),
        (None, Some(arr)) => (arr, ']'),
        (None, None) => return None,
    };

    let head = &text[start..];
    let bounded = match text.rfind(closer) {
        Some(end) if end >= start => Some(&text[start..=end]),
        _ => None,
    };

    Some(Span { head, bounded })
}
