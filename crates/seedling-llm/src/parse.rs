//! Extract a JSON payload from an LLM reply
//!
//! Models often wrap JSON in prose or markdown fences. The outermost `{...}`
//! span is tried first, then the raw text.

use crate::error::AiError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static OBJECT_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("object-span pattern is valid"));

/// Parse the JSON object embedded in `raw`
///
/// # Errors
///
/// [`AiError::InvalidResponse`] with a preview of `raw` when neither the
/// extracted span nor the raw text parses.
pub fn extract_json_payload(raw: &str) -> Result<Value, AiError> {
    if let Some(span) = OBJECT_SPAN.find(raw) {
        if let Ok(value) = serde_json::from_str::<Value>(span.as_str()) {
            return Ok(value);
        }
    }

    serde_json::from_str::<Value>(raw.trim())
        .map_err(|e| AiError::invalid_response(format!("Reply is not valid JSON: {}", e), raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let value = extract_json_payload(r#"{"score": 8}"#).unwrap();
        assert_eq!(value["score"], 8);
    }

    #[test]
    fn test_json_with_prose() {
        let raw = "Here is my analysis:\n{\"centers\": [{\"text\": \"the kitchen\"}]}\nHope this helps!";
        let value = extract_json_payload(raw).unwrap();
        assert_eq!(value["centers"][0]["text"], "the kitchen");
    }

    #[test]
    fn test_json_in_markdown_fence() {
        let raw = "```json\n{\"hasUnity\": true}\n```";
        let value = extract_json_payload(raw).unwrap();
        assert_eq!(value["hasUnity"], true);
    }

    #[test]
    fn test_falls_back_to_raw_text() {
        // Braces inside the array confuse the span but the raw text parses
        let raw = r#"[{"a": 1}, {"b": 2}]"#;
        let value = extract_json_payload(raw).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn test_invalid_reply_has_preview() {
        match extract_json_payload("I could not find any centers, sorry.") {
            Err(AiError::InvalidResponse { preview, .. }) => {
                assert!(preview.starts_with("I could not find"));
            }
            other => panic!("Expected InvalidResponse, got {:?}", other),
        }
    }
}
