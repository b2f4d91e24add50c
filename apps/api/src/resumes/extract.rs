//! Resume extraction — downloads a resume and asks the model for a structured profile.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_SYSTEM};
use crate::llm_client::structured::{lenient_string, null_as_default};
use crate::llm_client::{generate_json, GenerativeBackend};
use crate::resumes::prompts::RESUME_EXTRACT_PROMPT_TEMPLATE;
use crate::shortlist::fetcher::{FetchError, ResumeFetcher};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalDetails {
    #[serde(deserialize_with = "lenient_string")]
    pub tagline: String,
    #[serde(deserialize_with = "lenient_string")]
    pub about: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "lenient_string")]
    pub college_university: String,
    #[serde(deserialize_with = "lenient_string")]
    pub graduation_year: String,
    #[serde(deserialize_with = "lenient_string")]
    pub field_of_study: String,
    #[serde(deserialize_with = "lenient_string")]
    pub degree: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub link: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    #[serde(deserialize_with = "lenient_string")]
    pub job_title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(deserialize_with = "lenient_string")]
    pub duration: String,
    #[serde(deserialize_with = "lenient_string")]
    pub responsibilities: String,
}

/// Structured resume as returned by the model. Every field defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedResume {
    #[serde(deserialize_with = "null_as_default")]
    pub personal: PersonalDetails,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "null_as_default")]
    pub work_experience: Vec<WorkExperience>,
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::UnsupportedFormat(_) => {
                AppError::Validation("Unsupported file type".to_string())
            }
            FetchError::InvalidUrl { .. } => AppError::Validation(err.to_string()),
            other => AppError::Upstream(format!("Could not read resume: {other}")),
        }
    }
}

/// Fetches the resume at `resume_url` and extracts a [`ParsedResume`] from it.
/// Only `.pdf` and `.txt` resumes are accepted.
pub async fn extract_resume(
    fetcher: &ResumeFetcher,
    llm: &dyn GenerativeBackend,
    resume_url: &str,
) -> Result<ParsedResume, AppError> {
    let resume_text = fetcher.fetch_text(resume_url, None).await?;
    info!("Extracting structured resume ({} chars)", resume_text.len());

    let prompt = fill_template(
        RESUME_EXTRACT_PROMPT_TEMPLATE,
        &[("resume_text", resume_text.as_str())],
    );
    generate_json::<ParsedResume>(llm, &prompt, Some(JSON_ONLY_SYSTEM))
        .await
        .map_err(|e| AppError::Llm(format!("Resume extraction failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::llm_client::testing::StubBackend;

    #[test]
    fn test_parsed_resume_defaults_missing_and_null_fields() {
        let parsed: ParsedResume = serde_json::from_str(
            r#"{
                "personal": {"tagline": null, "email": "ada@example.com", "skills": null},
                "education": [{"degree": "BSc"}],
                "work_experience": null
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.personal.email, "ada@example.com");
        assert_eq!(parsed.personal.tagline, "");
        assert!(parsed.personal.skills.is_empty());
        assert_eq!(parsed.education[0].degree, "BSc");
        assert_eq!(parsed.education[0].college_university, "");
        assert!(parsed.projects.is_empty());
        assert!(parsed.work_experience.is_empty());
    }

    #[test]
    fn test_parsed_resume_accepts_numeric_scalars() {
        let parsed: ParsedResume = serde_json::from_str(
            r#"{
                "education": [{"degree": "BSc", "graduation_year": 2021}],
                "work_experience": [{"job_title": "Engineer", "duration": 3}]
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.education[0].graduation_year, "2021");
        assert_eq!(parsed.work_experience[0].duration, "3");
    }

    #[test]
    fn test_fetch_errors_map_to_client_or_gateway_errors() {
        let unsupported: AppError = FetchError::UnsupportedFormat("docx".to_string()).into();
        assert!(matches!(unsupported, AppError::Validation(ref m) if m == "Unsupported file type"));

        let status: AppError = FetchError::Status {
            status: 404,
            url: "https://cdn.example.com/cv.pdf".to_string(),
        }
        .into();
        assert!(matches!(status, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_extract_resume_from_text_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cv.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Ada Lovelace, ada@example.com"))
            .mount(&server)
            .await;
        let llm = StubBackend::replying(
            "```json\n{\"personal\": {\"email\": \"ada@example.com\", \"skills\": [\"Math\"]}}\n```",
        );
        let fetcher = ResumeFetcher::new(Duration::from_secs(5)).unwrap();

        let parsed = extract_resume(&fetcher, &llm, &format!("{}/cv.txt", server.uri()))
            .await
            .unwrap();
        assert_eq!(parsed.personal.skills, vec!["Math".to_string()]);

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("Ada Lovelace, ada@example.com"));
    }

    #[tokio::test]
    async fn test_extract_resume_rejects_docx() {
        let fetcher = ResumeFetcher::new(Duration::from_secs(5)).unwrap();
        let llm = StubBackend::replying("{}");
        let err = extract_resume(&fetcher, &llm, "https://cdn.example.com/cv.docx")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(llm.prompt_count(), 0);
    }
}
