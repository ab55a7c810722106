//! Code-fence stripping for generated script payloads.

use std::sync::OnceLock;

use regex::Regex;

static FENCED_BLOCK: OnceLock<Regex> = OnceLock::new();

fn fenced_block() -> &'static Regex {
    FENCED_BLOCK.get_or_init(|| {
        Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("valid fence pattern")
    })
}

/// Return the body of the first fenced block in `text`, or the trimmed
/// text itself when it has no complete fence.
///
/// An opening fence without a closing one (a truncated generation) is
/// stripped as well, so the remainder still gets a chance to parse.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(body) = fenced_block()
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
    {
        return body.as_str().trim();
    }
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        return rest.trim();
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_is_returned_trimmed() {
        assert_eq!(strip_code_fences("  {\"key\": \"value\"}\n"), r#"{"key": "value"}"#);
    }

    #[test]
    fn json_fence_is_removed() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), r#"{"key": "value"}"#);
    }

    #[test]
    fn bare_fence_is_removed() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), r#"{"key": "value"}"#);
    }

    #[test]
    fn fence_inside_prose_is_extracted() {
        let input = "Here is your script:\n\n```json\n{\"title\": \"T\"}\n```\n\nEnjoy!";
        assert_eq!(strip_code_fences(input), r#"{"title": "T"}"#);
    }

    #[test]
    fn first_of_several_fences_wins() {
        let input = "```json\n{\"a\": 1}\n```\nand\n```json\n{\"b\": 2}\n```";
        assert_eq!(strip_code_fences(input), r#"{"a": 1}"#);
    }

    #[test]
    fn unterminated_fence_is_stripped() {
        let input = "```json\n{\"key\": \"value\"}";
        assert_eq!(strip_code_fences(input), r#"{"key": "value"}"#);
    }

    #[test]
    fn single_line_fence() {
        assert_eq!(strip_code_fences("```{\"a\": 1}```"), r#"{"a": 1}"#);
    }
}
