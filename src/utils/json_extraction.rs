//! JSON extraction from LLM responses.
//!
//! Even with a JSON response-format hint, models sometimes wrap their
//! output in markdown code blocks or lead with prose. The extraction
//! strategies are tried in order:
//!
//! 1. Direct JSON (content starts with '{')
//! 2. JSON in a ```json or generic code block
//! 3. First balanced JSON object anywhere in the content

use regex::Regex;

/// Attempts to extract a JSON object from an LLM response.
///
/// Returns `None` when no candidate object can be found; the caller
/// treats that the same as a malformed response.
pub fn extract_json_object(content: &str) -> Option<String> {
    let trimmed = content.trim();

    // Strategy 1: direct JSON
    if trimmed.starts_with('{') {
        if let Some(obj) = find_balanced_object(trimmed) {
            return Some(obj);
        }
    }

    // Strategy 2: markdown code blocks
    let fence = Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("valid regex");
    if let Some(caps) = fence.captures(trimmed) {
        let candidate = caps.get(1).map(|m| m.as_str().trim())?;
        if let Some(obj) = find_balanced_object(candidate) {
            return Some(obj);
        }
    }

    // Strategy 3: first balanced object anywhere
    let start = trimmed.find('{')?;
    find_balanced_object(&trimmed[start..])
}

/// Returns the leading balanced JSON object of `s`, honoring string
/// literals and escapes, or `None` if the object never closes.
fn find_balanced_object(s: &str) -> Option<String> {
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escape_next = false;
    let mut started = false;

    for (i, c) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => {
                depth += 1;
                started = true;
            }
            '}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if started && depth == 0 {
                    return Some(s[..=i].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_direct_json() {
        let content = r#"{"scenarios": [1, 2, 3]}"#;
        assert_eq!(extract_json_object(content), Some(content.to_string()));
    }

    #[test]
    fn test_extract_from_json_code_block() {
        let content = "Here you go:\n```json\n{\"scenarios\": []}\n```\nDone.";
        assert_eq!(
            extract_json_object(content),
            Some("{\"scenarios\": []}".to_string())
        );
    }

    #[test]
    fn test_extract_from_generic_code_block() {
        let content = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_object(content), Some("{\"a\": 1}".to_string()));
    }

    #[test]
    fn test_extract_with_leading_prose() {
        let content = "Sure! The batch is {\"scenarios\": [{\"x\": \"}\"}]} hope that helps";
        assert_eq!(
            extract_json_object(content),
            Some("{\"scenarios\": [{\"x\": \"}\"}]}".to_string())
        );
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let content = r#"{"text": "a { b } c"}"#;
        assert_eq!(extract_json_object(content), Some(content.to_string()));
    }

    #[test]
    fn test_truncated_object_returns_none() {
        let content = r#"{"scenarios": [{"user_prompt": "unterminated"#;
        assert_eq!(extract_json_object(content), None);
    }

    #[test]
    fn test_no_json_returns_none() {
        assert_eq!(extract_json_object("I cannot help with that."), None);
        assert_eq!(extract_json_object(""), None);
    }
}
