//! Resume analysis — one resume scored and summarised against one job.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::analysis::prompts::{RESUME_ANALYSIS_PROMPT_TEMPLATE, RESUME_ANALYSIS_SYSTEM};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::structured::null_as_default;
use crate::llm_client::{generate_json, GenerativeBackend, LlmError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysisRequest {
    #[serde(default)]
    pub resume_text: String,
    /// Job details as the front end holds them; forwarded to the model verbatim.
    #[serde(default)]
    pub job: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutSection {
    #[serde(deserialize_with = "null_as_default")]
    pub extracurricular: String,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: String,
    #[serde(deserialize_with = "null_as_default")]
    pub other: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisDetails {
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub matching_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub missing_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: String,
    #[serde(deserialize_with = "null_as_default")]
    pub education: String,
    #[serde(deserialize_with = "null_as_default")]
    pub about: AboutSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeAnalysis {
    /// `None` when the model gave no usable number (e.g. "N/A").
    #[serde(deserialize_with = "lenient_score")]
    pub match_score: Option<u8>,
    #[serde(deserialize_with = "null_as_default")]
    pub resume_analysis: AnalysisDetails,
}

#[derive(Debug, Serialize)]
pub struct ResumeAnalysisResponse {
    pub analysis: ResumeAnalysis,
}

/// Accepts `85`, `85.4`, `"85"`, `"85%"`; clamps to 0-100. Anything else is `None`.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| n.is_finite())
        .map(|n| n.round().clamp(0.0, 100.0) as u8))
}

/// Asks the model for a structured analysis of `resume_text` against `job`.
///
/// Unparseable model output surfaces as [`LlmError::Parse`] carrying the raw text.
pub async fn analyze_resume(
    llm: &dyn GenerativeBackend,
    resume_text: &str,
    job: &Value,
) -> Result<ResumeAnalysis, LlmError> {
    let job_json = serde_json::to_string_pretty(job).unwrap_or_else(|_| job.to_string());
    let prompt = fill_template(
        RESUME_ANALYSIS_PROMPT_TEMPLATE,
        &[("resume_text", resume_text), ("job", job_json.as_str())],
    );
    generate_json::<ResumeAnalysis>(llm, &prompt, Some(RESUME_ANALYSIS_SYSTEM)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::llm_client::testing::StubBackend;

    #[test]
    fn test_lenient_score_variants() {
        let cases = [
            (json!({"matchScore": 85}), Some(85)),
            (json!({"matchScore": "72%"}), Some(72)),
            (json!({"matchScore": 64.6}), Some(65)),
            (json!({"matchScore": 130}), Some(100)),
            (json!({"matchScore": "N/A"}), None),
            (json!({"matchScore": null}), None),
            (json!({}), None),
        ];
        for (input, expected) in cases {
            let analysis: ResumeAnalysis = serde_json::from_value(input.clone()).unwrap();
            assert_eq!(analysis.match_score, expected, "input: {input}");
        }
    }

    #[tokio::test]
    async fn test_analyze_resume_parses_fenced_reply() {
        let reply = r#"```json
{
  "matchScore": "78",
  "resumeAnalysis": {
    "summary": "Backend engineer with 6 years of experience.",
    "matchingSkills": ["Rust", "PostgreSQL"],
    "missingSkills": ["Kubernetes"],
    "experience": "Built payment services.",
    "education": "BSc Computer Science",
    "about": {"extracurricular": "N/A", "certifications": "AWS SA", "other": null}
  }
}
```"#;
        let llm = StubBackend::replying(reply);
        let job = json!({"title": "Platform Engineer", "skills": ["Rust"]});

        let analysis = analyze_resume(&llm, "resume text", &job).await.unwrap();
        assert_eq!(analysis.match_score, Some(78));
        assert_eq!(analysis.resume_analysis.matching_skills, ["Rust", "PostgreSQL"]);
        assert_eq!(analysis.resume_analysis.about.certifications, "AWS SA");
        assert_eq!(analysis.resume_analysis.about.other, "");

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("Platform Engineer"));
    }

    #[tokio::test]
    async fn test_analyze_resume_surfaces_raw_text_on_garbage() {
        let llm = StubBackend::replying("The candidate seems nice.");
        let err = analyze_resume(&llm, "resume", &json!({})).await.unwrap_err();
        match err {
            LlmError::Parse(parse) => assert_eq!(parse.raw, "The candidate seems nice."),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
