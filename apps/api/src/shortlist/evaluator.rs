//! Batch Evaluator — asks the generative backend for one verdict per applicant.

use std::sync::Arc;

use tracing::warn;

use crate::llm_client::prompts::fill_template;
use crate::llm_client::GenerativeBackend;
use crate::shortlist::models::{ApplicantInput, ApplicantOutcome};
use crate::shortlist::parser::{parse_verdict, VerdictError};
use crate::shortlist::prompts::{SHORTLIST_PROMPT_TEMPLATE, SHORTLIST_SYSTEM};

#[derive(Clone)]
pub struct BatchEvaluator {
    backend: Arc<dyn GenerativeBackend>,
}

impl BatchEvaluator {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Evaluates one applicant. Never fails: backend and parse errors become
    /// `Failed` outcomes so the rest of the batch is unaffected.
    pub async fn evaluate(
        &self,
        applicant: &ApplicantInput,
        resume_text: &str,
        job_description: &str,
    ) -> ApplicantOutcome {
        let application_id = applicant.application_id.as_str();
        let prompt = build_prompt(applicant, resume_text, job_description);

        let text = match self.backend.generate(&prompt, Some(SHORTLIST_SYSTEM)).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Model call failed for application {}: {}", application_id, e);
                return ApplicantOutcome::analysis_failed(application_id, e.to_string(), None);
            }
        };

        match parse_verdict(&text, application_id) {
            Ok(verdict) => ApplicantOutcome::Evaluated(verdict),
            Err(e) => {
                warn!(
                    "Unusable verdict for application {}: {}",
                    application_id, e
                );
                let raw = match &e {
                    VerdictError::Unparseable(parse) => parse.raw.clone(),
                    _ => text,
                };
                ApplicantOutcome::analysis_failed(application_id, e.to_string(), Some(raw))
            }
        }
    }
}

pub fn build_prompt(applicant: &ApplicantInput, resume_text: &str, job_description: &str) -> String {
    fill_template(
        SHORTLIST_PROMPT_TEMPLATE,
        &[
            ("application_id", applicant.application_id.as_str()),
            ("cover_letter", applicant.cover_letter.as_deref().unwrap_or("")),
            ("resume", resume_text),
            ("job_description", job_description),
        ],
    )
}
