//! Structured output recovery for model text.
//!
//! Models are told to answer with bare JSON but regularly wrap it in markdown
//! fences or surround it with prose. Parsing runs an ordered chain of
//! [`JsonAttempt`]s; the first candidate that deserializes wins.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// One way of carving a JSON candidate out of model text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonAttempt {
    /// The whole (trimmed) text.
    Direct,
    /// The body of the first ```` ```json ```` block, wherever it appears.
    FencedBlock,
    /// The text with leading/trailing fence markers removed.
    StrippedFences,
}

/// Attempts in the order they are tried.
pub const ATTEMPT_ORDER: [JsonAttempt; 3] = [
    JsonAttempt::Direct,
    JsonAttempt::FencedBlock,
    JsonAttempt::StrippedFences,
];

impl JsonAttempt {
    /// Returns the candidate slice for this attempt, or `None` when the
    /// attempt does not apply to `text`.
    pub fn candidate(self, text: &str) -> Option<&str> {
        match self {
            JsonAttempt::Direct => Some(text.trim()),
            JsonAttempt::FencedBlock => fenced_block(text),
            JsonAttempt::StrippedFences => Some(strip_json_fences(text)),
        }
    }
}

#[derive(Debug, Error)]
#[error("model output is not valid JSON ({last_error})")]
pub struct StructuredParseError {
    pub last_error: String,
    /// The untouched model text, kept for diagnostics.
    pub raw: String,
}

/// Runs the attempt chain and deserializes the first candidate that parses.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, StructuredParseError> {
    let mut last_error = String::from("empty model output");
    let mut tried: Vec<&str> = Vec::with_capacity(ATTEMPT_ORDER.len());

    for attempt in ATTEMPT_ORDER {
        let Some(candidate) = attempt.candidate(text) else {
            continue;
        };
        if candidate.is_empty() || tried.contains(&candidate) {
            continue;
        }
        tried.push(candidate);

        match serde_json::from_str::<T>(candidate) {
            Ok(value) => {
                debug!("Structured output recovered via {:?}", attempt);
                return Ok(value);
            }
            Err(e) => last_error = e.to_string(),
        }
    }

    Err(StructuredParseError {
        last_error,
        raw: text.to_string(),
    })
}

/// Serde helper: models write `null` where the prompt asked for `""` or `[]`;
/// treat both as the field's default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serde helper for free-text fields: numbers and booleans (a graduation year of
/// `2021`) become their text, `null` becomes `""`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Extracts the body of a ```` ```json\n ... \n``` ```` block.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```json")? + "```json".len();
    let after_tag = &text[start..];
    let body = after_tag
        .strip_prefix("\r\n")
        .or_else(|| after_tag.strip_prefix('\n'))?;
    let end = body.find("\n```")?;
    Some(body[..end].trim_end_matches('\r').trim())
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        key: String,
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_fenced_block_found_after_prose() {
        let input = "Here is the analysis:\n```json\n{\"key\": \"value\"}\n```\nThanks!";
        assert_eq!(fenced_block(input), Some("{\"key\": \"value\"}"));
    }

    #[test]
    fn test_fenced_block_requires_newline_after_tag() {
        assert_eq!(fenced_block("```json{\"key\": 1}```"), None);
    }

    #[test]
    fn test_parse_structured_direct() {
        let parsed: Sample = parse_structured("  {\"key\": \"direct\"}  ").unwrap();
        assert_eq!(parsed.key, "direct");
    }

    #[test]
    fn test_parse_structured_fenced_equals_unfenced() {
        let body = r#"{"key": "same", "extra": [1, 2, 3]}"#;
        let plain: Value = parse_structured(body).unwrap();
        let fenced: Value = parse_structured(&format!("```json\n{body}\n```")).unwrap();
        assert_eq!(plain, fenced);
    }

    #[test]
    fn test_parse_structured_with_surrounding_prose() {
        let input = "Sure!\n```json\n{\"key\": \"prose\"}\n```\nLet me know.";
        let parsed: Sample = parse_structured(input).unwrap();
        assert_eq!(parsed.key, "prose");
    }

    #[test]
    fn test_parse_structured_bare_fence_without_tag() {
        let parsed: Sample = parse_structured("```\n{\"key\": \"bare\"}\n```").unwrap();
        assert_eq!(parsed.key, "bare");
    }

    #[test]
    fn test_parse_structured_failure_keeps_raw_text() {
        let raw = "I could not evaluate this resume.";
        let err = parse_structured::<Sample>(raw).unwrap_err();
        assert_eq!(err.raw, raw);
        assert!(!err.last_error.is_empty());
    }

    #[test]
    fn test_lenient_string_accepts_scalars() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "lenient_string")]
            year: String,
        }
        let cases = [
            (r#"{"year": "2021"}"#, "2021"),
            (r#"{"year": 2021}"#, "2021"),
            (r#"{"year": true}"#, "true"),
            (r#"{"year": null}"#, ""),
            (r#"{}"#, ""),
        ];
        for (input, expected) in cases {
            let row: Row = serde_json::from_str(input).unwrap();
            assert_eq!(row.year, expected, "input: {input}");
        }
    }

    #[test]
    fn test_parse_structured_empty_input() {
        let err = parse_structured::<Sample>("   ").unwrap_err();
        assert_eq!(err.last_error, "empty model output");
    }
}
