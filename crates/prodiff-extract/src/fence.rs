//! Fenced code block extraction
//!
//! Models wrap JSON in markdown fences despite instructions not to. When a
//! complete fenced block is present, its interior becomes the parse
//! candidate; a `json`-tagged block is preferred over an untagged one, and
//! the first block found wins.

/// Interior of the first complete fenced block, or `None` when the text has
/// no closed fence.
pub(crate) fn fenced_block(text: &str) -> Option<&str> {
    if let Some(inner) = delimited(text, "```json") {
        return Some(inner);
    }
    delimited(text, "```")
}

fn delimited<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_tagged_fence() {
        let text = "Here:\n```json\n{\"key\": 1}\n```\nDone.";
        assert_eq!(fenced_block(text), Some("{\"key\": 1}"));
    }

    #[test]
    fn test_untagged_fence() {
        let text = "```\n{\"key\": 1}\n```";
        assert_eq!(fenced_block(text), Some("{\"key\": 1}"));
    }

    #[test]
    fn test_no_fence() {
        assert_eq!(fenced_block("{\"key\": 1}"), None);
    }

    #[test]
    fn test_unclosed_fence_is_ignored() {
        assert_eq!(fenced_block("```json\n{\"key\": 1}"), None);
    }

    #[test]
    fn test_first_of_multiple_blocks() {
        let text = "```json\n{\"a\": 1}\n```\nand also\n```json\n{\"b\": 2}\n```";
        assert_eq!(fenced_block(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_json_tag_preferred_over_plain() {
        let text = "```\nnot json\n```\n```json\n{\"a\": 1}\n```";
        assert_eq!(fenced_block(text), Some("{\"a\": 1}"));
    }
}
