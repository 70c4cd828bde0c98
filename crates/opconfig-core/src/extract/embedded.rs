//! Fenced JSON blocks in note fields
//!
//! A note whose trimmed text is wrapped in a ```` ```json ```` fence is
//! treated as configuration:
//!
//! ````text
//! ```json
//! { "Smtp": { "Host": "mail.local", "Port": 25 } }
//! ```
//! ````

use thiserror::Error;

use crate::config::{ConfigError, ConfigLayer};

/// Opening fence; the language tag is part of the token
pub const JSON_FENCE_OPEN: &str = "```json";
/// Closing fence
pub const JSON_FENCE_CLOSE: &str = "```";

/// Errors from parsing a recognized block
#[derive(Error, Debug)]
pub enum EmbeddedConfigError {
    #[error("embedded config in '{source_name}' is not a valid JSON object: {reason}")]
    Malformed {
        source_name: String,
        reason: ConfigError,
    },
}

/// Text between the fences, untrimmed, or `None` when `text` is not fenced
fn fenced_body(text: &str) -> Option<&str> {
    text.trim()
        .strip_prefix(JSON_FENCE_OPEN)?
        .strip_suffix(JSON_FENCE_CLOSE)
}

/// Whether `text` is a fenced JSON block.
///
/// Only the fences are checked; the content may still be invalid JSON.
pub fn is_fenced_json(text: &str) -> bool {
    fenced_body(text).is_some()
}

/// Parse a fenced JSON block into a configuration layer named `source`.
///
/// Returns `Ok(None)` when `text` is not fenced. Content inside a fence
/// that is not a JSON object is an error.
pub fn parse_fenced_json(
    text: &str,
    source: &str,
) -> Result<Option<ConfigLayer>, EmbeddedConfigError> {
    let Some(body) = fenced_body(text) else {
        return Ok(None);
    };

    ConfigLayer::from_json_str(source, body.trim())
        .map(Some)
        .map_err(|reason| EmbeddedConfigError::Malformed {
            source_name: source.to_string(),
            reason,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_fenced_json() {
        assert!(is_fenced_json("```json\n{\"a\":1}\n```"));
        assert!(is_fenced_json("  \n```json\n{}\n```\n  "));
        assert!(!is_fenced_json("plain text"));
        assert!(!is_fenced_json("```json\n{broken"));
    }

    #[test]
    fn test_language_tag_required() {
        assert!(!is_fenced_json("```\n{\"a\":1}\n```"));
        assert!(!is_fenced_json("```yaml\na: 1\n```"));
        assert!(!is_fenced_json("```JSON\n{}\n```"));
    }

    #[test]
    fn test_bare_open_fence_is_not_closed() {
        // The opening token alone must not count as its own closing fence
        assert!(!is_fenced_json("```json"));
        assert!(is_fenced_json("```json```"));
    }

    #[test]
    fn test_parse_simple_block() {
        let layer = parse_fenced_json("```json\n{\"Foo\":\"bar\"}\n```", "Payments")
            .unwrap()
            .unwrap();
        assert_eq!(layer.get("Foo"), Some("bar"));
        assert_eq!(layer.source(), "Payments");
    }

    #[test]
    fn test_parse_nested_block() {
        let text = "```json\n{\"Smtp\": {\"Host\": \"mail.local\", \"Port\": 25}}\n```";
        let layer = parse_fenced_json(text, "Mail").unwrap().unwrap();
        assert_eq!(layer.get("Smtp:Host"), Some("mail.local"));
        assert_eq!(layer.get("Smtp:Port"), Some("25"));
    }

    #[test]
    fn test_parse_not_fenced_is_none() {
        assert!(parse_fenced_json("just some notes", "x").unwrap().is_none());
        assert!(parse_fenced_json("", "x").unwrap().is_none());
    }

    #[test]
    fn test_parse_invalid_json_in_fence() {
        let err = parse_fenced_json("```json\n{\"a\": }\n```", "Broken").unwrap_err();
        let EmbeddedConfigError::Malformed { source_name, reason } = err;
        assert_eq!(source_name, "Broken");
        assert!(matches!(reason, ConfigError::Json(_)));
    }

    #[test]
    fn test_parse_non_object_in_fence() {
        let err = parse_fenced_json("```json\n[1, 2]\n```", "List").unwrap_err();
        assert!(err.to_string().contains("List"));
    }

    #[test]
    fn test_parse_empty_fence() {
        assert!(parse_fenced_json("```json```", "Empty").is_err());
    }
}
