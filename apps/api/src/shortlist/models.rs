//! Request, verdict, and outcome types for AI shortlisting.

use serde::{Deserialize, Serialize, Serializer};

/// Shown to the employer when an applicant's resume could not be fetched or read.
pub const RESUME_READ_ERROR: &str = "Error reading resume.";
/// Shown to the employer when the model call or its output failed.
pub const ANALYSIS_ERROR: &str = "Failed to analyze resume";

// ────────────────────────────────────────────────────────────────────────────
// Request / response
// ────────────────────────────────────────────────────────────────────────────

/// One applicant submitted for shortlisting.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantInput {
    pub application_id: String,
    #[serde(default, alias = "resumeLocation")]
    pub resume_url: Option<String>,
    #[serde(default, alias = "coverLetterText")]
    pub cover_letter: Option<String>,
}

impl ApplicantInput {
    /// The resume location, if one was supplied and is not blank.
    pub fn resume_location(&self) -> Option<&str> {
        self.resume_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistRequest {
    pub applicants: Vec<ApplicantInput>,
    /// Only required when there is at least one applicant.
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistResponse {
    pub success: bool,
    pub message: String,
    /// Number of applicants processed.
    pub count: usize,
    pub top_applicants: Vec<ApplicantOutcome>,
}

// ────────────────────────────────────────────────────────────────────────────
// Verdicts
// ────────────────────────────────────────────────────────────────────────────

/// The model's two-valued decision. Serialized as the display text the UI renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ShortlistDecision {
    Shortlist,
    Reject,
}

impl ShortlistDecision {
    pub fn display_text(self) -> &'static str {
        match self {
            ShortlistDecision::Shortlist => "✅ Shortlist",
            ShortlistDecision::Reject => "❌ Reject",
        }
    }

    /// Recognises "✅ Shortlist", "shortlisted", "REJECT" and "Rejected".
    ///
    /// Only the bare word (ignoring case, the emoji and surrounding punctuation) is
    /// accepted; phrases such as "Not shortlisted" are `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        match word.as_str() {
            "shortlist" | "shortlisted" => Some(ShortlistDecision::Shortlist),
            "reject" | "rejected" => Some(ShortlistDecision::Reject),
            _ => None,
        }
    }
}

impl TryFrom<String> for ShortlistDecision {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ShortlistDecision::parse(&value)
            .ok_or_else(|| format!("unrecognised shortlisting decision '{value}'"))
    }
}

impl Serialize for ShortlistDecision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_text())
    }
}

/// Structured judgment for one applicant, validated against the expected schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistVerdict {
    pub application_id: String,
    pub match_score: u8,
    pub matched_summary: Vec<String>,
    pub shortlisting_decision: ShortlistDecision,
    pub reason: String,
    pub consider: bool,
}

/// Details of an applicant whose evaluation did not produce a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedEvaluation {
    pub application_id: String,
    /// User-facing sentinel, one of [`RESUME_READ_ERROR`] or [`ANALYSIS_ERROR`].
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Model text that failed to parse, for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    pub consider: bool,
}

/// Per-applicant result. Exactly one is produced for every applicant in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApplicantOutcome {
    Evaluated(ShortlistVerdict),
    Failed(FailedEvaluation),
    NotEvaluated {
        #[serde(rename = "applicationId")]
        application_id: String,
        reason: String,
        consider: bool,
    },
}

impl ApplicantOutcome {
    pub fn resume_unreadable(application_id: &str, reason: impl Into<String>) -> Self {
        ApplicantOutcome::Failed(FailedEvaluation {
            application_id: application_id.to_string(),
            error: RESUME_READ_ERROR.to_string(),
            reason: Some(reason.into()),
            raw: None,
            consider: false,
        })
    }

    pub fn analysis_failed(
        application_id: &str,
        reason: impl Into<String>,
        raw: Option<String>,
    ) -> Self {
        ApplicantOutcome::Failed(FailedEvaluation {
            application_id: application_id.to_string(),
            error: ANALYSIS_ERROR.to_string(),
            reason: Some(reason.into()),
            raw,
            consider: false,
        })
    }

    pub fn not_evaluated(application_id: &str, reason: impl Into<String>) -> Self {
        ApplicantOutcome::NotEvaluated {
            application_id: application_id.to_string(),
            reason: reason.into(),
            consider: false,
        }
    }

    pub fn application_id(&self) -> &str {
        match self {
            ApplicantOutcome::Evaluated(verdict) => &verdict.application_id,
            ApplicantOutcome::Failed(failed) => &failed.application_id,
            ApplicantOutcome::NotEvaluated { application_id, .. } => application_id,
        }
    }

    /// True only for evaluated applicants the model marked `consider`.
    pub fn is_considered(&self) -> bool {
        matches!(self, ApplicantOutcome::Evaluated(verdict) if verdict.consider)
    }

    pub fn verdict(&self) -> Option<&ShortlistVerdict> {
        match self {
            ApplicantOutcome::Evaluated(verdict) => Some(verdict),
            _ => None,
        }
    }
}
