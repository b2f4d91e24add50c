//! Response Parser — turns model text into a validated [`ShortlistVerdict`].
//!
//! JSON recovery (direct → ```json block → stripped fences) is shared with the
//! other AI routes; this module adds the verdict schema on top.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::llm_client::structured::{parse_structured, StructuredParseError};
use crate::shortlist::models::{ShortlistDecision, ShortlistVerdict};

#[derive(Debug, Error)]
pub enum VerdictError {
    #[error(transparent)]
    Unparseable(#[from] StructuredParseError),

    #[error("matchScore is missing")]
    MissingScore,

    #[error("matchScore must be a whole number, got {0}")]
    InvalidScore(String),

    #[error("matchScore {0} is outside 0-100")]
    ScoreOutOfRange(i64),

    #[error("shortlistingDecision is missing")]
    MissingDecision,

    #[error("unrecognised shortlistingDecision '{0}'")]
    UnknownDecision(String),

    #[error("matchedSummary must be a list of strings")]
    InvalidSummary,

    #[error("{0} must be a string")]
    NotAString(&'static str),

    #[error("consider must be a boolean")]
    InvalidConsider,
}

/// Model output before validation. Every field is optional so that shape errors are
/// reported by name instead of as a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVerdict {
    application_id: Option<Value>,
    match_score: Option<Value>,
    matched_summary: Option<Value>,
    shortlisting_decision: Option<Value>,
    reason: Option<Value>,
    consider: Option<Value>,
}

/// Parses and validates the model's reply for `application_id`.
///
/// The caller's id always wins over whatever id the model echoed back.
pub fn parse_verdict(text: &str, application_id: &str) -> Result<ShortlistVerdict, VerdictError> {
    let raw: RawVerdict = parse_structured(text)?;

    if let Some(echoed) = raw.application_id.as_ref().and_then(Value::as_str) {
        if echoed != application_id {
            warn!(
                "Model echoed applicationId '{}' for application {}; keeping the request id",
                echoed, application_id
            );
        }
    }

    let match_score = validate_score(raw.match_score)?;
    let shortlisting_decision = validate_decision(raw.shortlisting_decision)?;
    let matched_summary = validate_summary(raw.matched_summary)?;
    let reason = match raw.reason {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(_) => return Err(VerdictError::NotAString("reason")),
    };
    let consider = match raw.consider {
        None | Some(Value::Null) => shortlisting_decision == ShortlistDecision::Shortlist,
        Some(Value::Bool(b)) => b,
        Some(_) => return Err(VerdictError::InvalidConsider),
    };

    Ok(ShortlistVerdict {
        application_id: application_id.to_string(),
        match_score,
        matched_summary,
        shortlisting_decision,
        reason,
        consider,
    })
}

/// Accepts integers, integer-valued floats, and numeric strings ("85", "85%").
fn validate_score(value: Option<Value>) -> Result<u8, VerdictError> {
    let score = match value {
        None | Some(Value::Null) => return Err(VerdictError::MissingScore),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if f.fract() != 0.0 || !f.is_finite() {
                    return Err(VerdictError::InvalidScore(n.to_string()));
                }
                f as i64
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<i64>()
            .map_err(|_| VerdictError::InvalidScore(s.clone()))?,
        Some(other) => return Err(VerdictError::InvalidScore(other.to_string())),
    };

    u8::try_from(score)
        .ok()
        .filter(|s| *s <= 100)
        .ok_or(VerdictError::ScoreOutOfRange(score))
}

fn validate_decision(value: Option<Value>) -> Result<ShortlistDecision, VerdictError> {
    match value {
        None | Some(Value::Null) => Err(VerdictError::MissingDecision),
        Some(Value::String(s)) => {
            ShortlistDecision::parse(&s).ok_or(VerdictError::UnknownDecision(s))
        }
        Some(other) => Err(VerdictError::UnknownDecision(other.to_string())),
    }
}

fn validate_summary(value: Option<Value>) -> Result<Vec<String>, VerdictError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(VerdictError::InvalidSummary),
            })
            .collect(),
        Some(_) => Err(VerdictError::InvalidSummary),
    }
}
