use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::prompts::JOB_DESCRIPTION_PROMPT_TEMPLATE;
use crate::errors::AppError;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::GenerativeBackend;

/// Skills arrive either as a comma-separated string or as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillList {
    Text(String),
    Items(Vec<String>),
}

impl SkillList {
    pub fn joined(&self) -> String {
        match self {
            SkillList::Text(text) => text.trim().to_string(),
            SkillList::Items(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptionRequest {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company_name: String,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub expiry_date: Option<String>,
    pub skills: Option<SkillList>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct JobDescriptionResponse {
    pub description: String,
}

impl JobDescriptionRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.job_title.trim().is_empty() || self.company_name.trim().is_empty() {
            return Err(AppError::Validation(
                "jobTitle and companyName are required".to_string(),
            ));
        }
        Ok(())
    }

    fn prompt(&self) -> String {
        let or_unspecified = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or("Not specified")
                .to_string()
        };
        let skills = self
            .skills
            .as_ref()
            .map(SkillList::joined)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Not specified".to_string());

        let job_type = or_unspecified(&self.job_type);
        let location = or_unspecified(&self.location);
        let salary = or_unspecified(&self.salary);
        let expiry_date = or_unspecified(&self.expiry_date);

        fill_template(
            JOB_DESCRIPTION_PROMPT_TEMPLATE,
            &[
                ("job_title", self.job_title.trim()),
                ("company_name", self.company_name.trim()),
                ("job_type", job_type.as_str()),
                ("location", location.as_str()),
                ("salary", salary.as_str()),
                ("expiry_date", expiry_date.as_str()),
                ("skills", skills.as_str()),
            ],
        )
    }
}

/// Generates a markdown job description. The model's text is returned as-is.
pub async fn generate_job_description(
    llm: &dyn GenerativeBackend,
    request: &JobDescriptionRequest,
) -> Result<JobDescriptionResponse, AppError> {
    request.validate()?;
    info!(
        "Generating job description for '{}' at '{}'",
        request.job_title.trim(),
        request.company_name.trim()
    );

    let description = llm
        .generate(&request.prompt(), None)
        .await
        .map_err(|e| AppError::Llm(format!("Job description generation failed: {e}")))?;

    Ok(JobDescriptionResponse {
        description: description.trim().to_string(),
    })
}
