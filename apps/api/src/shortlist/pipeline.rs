//! Shortlisting pipeline — fetch → evaluate → parse → aggregate.
//!
//! Applicants run on a bounded pool of tokio tasks (`concurrency` in flight).
//! The stream is *ordered*: outcomes come back in input order no matter which
//! applicant finishes first, so the result lines up with the request by index
//! as well as by `applicationId`.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::llm_client::GenerativeBackend;
use crate::shortlist::evaluator::BatchEvaluator;
use crate::shortlist::fetcher::{ResumeFetcher, ResumeFormat};
use crate::shortlist::models::{ApplicantInput, ApplicantOutcome, ShortlistResponse};

pub const SUCCESS_MESSAGE: &str = "Applicants processed successfully";

/// Batch-level failure. Per-applicant failures never surface here.
#[derive(Debug, thiserror::Error)]
pub enum ShortlistError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("applicant task failed: {0}")]
    Batch(String),
}

/// Outcomes of one batch, in input order.
#[derive(Debug, Clone)]
pub struct ShortlistReport {
    pub outcomes: Vec<ApplicantOutcome>,
}

impl ShortlistReport {
    /// Caller-side shortlist: evaluated applicants the model marked `consider`.
    pub fn shortlist(&self) -> impl Iterator<Item = &ApplicantOutcome> {
        self.outcomes.iter().filter(|o| o.is_considered())
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ApplicantOutcome::Failed(_)))
            .count()
    }

    pub fn into_response(self) -> ShortlistResponse {
        ShortlistResponse {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            count: self.outcomes.len(),
            top_applicants: self.outcomes,
        }
    }
}

#[derive(Clone)]
pub struct ShortlistPipeline {
    fetcher: ResumeFetcher,
    evaluator: BatchEvaluator,
    concurrency: usize,
}

impl ShortlistPipeline {
    pub fn new(
        fetcher: ResumeFetcher,
        backend: Arc<dyn GenerativeBackend>,
        concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            evaluator: BatchEvaluator::new(backend),
            concurrency: concurrency.max(1),
        }
    }

    /// Runs the whole batch. Produces exactly one outcome per applicant.
    pub async fn run(
        &self,
        applicants: Vec<ApplicantInput>,
        job_description: &str,
    ) -> Result<ShortlistReport, ShortlistError> {
        if applicants.is_empty() {
            return Ok(ShortlistReport { outcomes: Vec::new() });
        }
        if job_description.trim().is_empty() {
            return Err(ShortlistError::InvalidRequest(
                "jobDescription cannot be empty".to_string(),
            ));
        }

        let total = applicants.len();
        let job_description: Arc<str> = Arc::from(job_description);

        let results: Vec<_> = stream::iter(applicants)
            .map(|applicant| {
                let pipeline = self.clone();
                let job_description = Arc::clone(&job_description);
                tokio::spawn(async move { pipeline.process(applicant, &job_description).await })
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let outcomes = results
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ShortlistError::Batch(e.to_string()))?;

        let report = ShortlistReport { outcomes };
        info!(
            "Shortlisted {} of {} applicants ({} failed)",
            report.shortlist().count(),
            total,
            report.failed_count()
        );
        Ok(report)
    }

    /// Fetches one resume and evaluates it.
    async fn process(&self, applicant: ApplicantInput, job_description: &str) -> ApplicantOutcome {
        let application_id = applicant.application_id.as_str();

        let Some(url) = applicant.resume_location() else {
            return ApplicantOutcome::not_evaluated(application_id, "No resume on file");
        };

        // Extension-less media URLs are almost always PDFs.
        let resume_text = match self.fetcher.fetch_text(url, Some(ResumeFormat::Pdf)).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not read resume for application {}: {}", application_id, e);
                return ApplicantOutcome::resume_unreadable(application_id, e.to_string());
            }
        };

        self.evaluator
            .evaluate(&applicant, &resume_text, job_description)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::llm_client::testing::StubBackend;
    use crate::llm_client::LlmError;
    use crate::shortlist::models::{ANALYSIS_ERROR, RESUME_READ_ERROR};

    fn reply(score: u8, consider: bool) -> String {
        let decision = if consider { "✅ Shortlist" } else { "❌ Reject" };
        format!(
            r#"```json
{{"matchScore": {score}, "matchedSummary": ["match"], "shortlistingDecision": "{decision}", "reason": "r", "consider": {consider}}}
```"#
        )
    }

    fn applicant(id: &str, url: Option<String>) -> ApplicantInput {
        ApplicantInput {
            application_id: id.to_string(),
            resume_url: url,
            cover_letter: Some(format!("cover letter of {id}")),
        }
    }

    async fn resume_host() -> MockServer {
        let server = MockServer::start().await;
        for name in ["alice", "bob", "carol"] {
            Mock::given(method("GET"))
                .and(path(format!("/{name}.txt")))
                .respond_with(ResponseTemplate::new(200).set_body_string(format!("resume of {name}")))
                .mount(&server)
                .await;
        }
        server
    }

    fn pipeline(backend: Arc<dyn GenerativeBackend>, concurrency: usize) -> ShortlistPipeline {
        let fetcher = ResumeFetcher::new(Duration::from_secs(5)).unwrap();
        ShortlistPipeline::new(fetcher, backend, concurrency)
    }

    #[tokio::test]
    async fn test_empty_batch_is_success_with_no_applicants() {
        let backend = Arc::new(StubBackend::replying("unused"));
        let report = pipeline(backend.clone(), 4)
            .run(vec![], "Backend engineer")
            .await
            .unwrap();
        let response = report.into_response();
        assert!(response.success);
        assert_eq!(response.count, 0);
        assert!(response.top_applicants.is_empty());
        assert_eq!(backend.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_job_description_is_rejected() {
        let backend = Arc::new(StubBackend::replying("unused"));
        let err = pipeline(backend.clone(), 4)
            .run(vec![applicant("a", None)], "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, ShortlistError::InvalidRequest(_)));
        assert_eq!(backend.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_batch_ignores_blank_job_description() {
        let backend = Arc::new(StubBackend::replying("unused"));
        let report = pipeline(backend, 4).run(vec![], "").await.unwrap();
        assert!(report.outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_missing_resume_on_middle_applicant() {
        // Applicant #2's resume URL returns 404; #1 and #3 are evaluated normally.
        let server = resume_host().await;
        let backend = Arc::new(
            StubBackend::replying(&reply(70, true)).with_reply("resume of carol", &reply(40, false)),
        );
        let applicants = vec![
            applicant("app-1", Some(format!("{}/alice.txt", server.uri()))),
            applicant("app-2", Some(format!("{}/gone.txt", server.uri()))),
            applicant("app-3", Some(format!("{}/carol.txt", server.uri()))),
        ];

        let report = pipeline(backend.clone(), 2)
            .run(applicants, "Rust engineer")
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 3);
        let ids: Vec<_> = report.outcomes.iter().map(|o| o.application_id()).collect();
        assert_eq!(ids, ["app-1", "app-2", "app-3"]);

        assert_eq!(report.outcomes[0].verdict().unwrap().match_score, 70);
        match &report.outcomes[1] {
            ApplicantOutcome::Failed(failed) => {
                assert_eq!(failed.error, RESUME_READ_ERROR);
                assert!(!failed.consider);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(report.outcomes[2].verdict().unwrap().match_score, 40);

        // The unreadable resume never reaches the model.
        assert_eq!(backend.prompt_count(), 2);
        assert_eq!(report.shortlist().count(), 1);
        assert_eq!(report.failed_count(), 1);
    }

    #[tokio::test]
    async fn test_model_failure_for_one_applicant_does_not_abort_batch() {
        let server = resume_host().await;
        let backend = Arc::new(
            StubBackend::replying(&reply(90, true)).with_failure("resume of bob", "503 overloaded"),
        );
        let applicants = vec![
            applicant("a", Some(format!("{}/alice.txt", server.uri()))),
            applicant("b", Some(format!("{}/bob.txt", server.uri()))),
        ];

        let report = pipeline(backend, 4).run(applicants, "JD").await.unwrap();
        assert_eq!(report.outcomes.len(), 2);
        assert!(report.outcomes[0].is_considered());
        match &report.outcomes[1] {
            ApplicantOutcome::Failed(failed) => assert_eq!(failed.error, ANALYSIS_ERROR),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_applicant_without_resume_is_not_evaluated() {
        let backend = Arc::new(StubBackend::replying(&reply(90, true)));
        let report = pipeline(backend.clone(), 4)
            .run(vec![applicant("x", None)], "JD")
            .await
            .unwrap();
        assert!(matches!(
            report.outcomes[0],
            ApplicantOutcome::NotEvaluated { .. }
        ));
        assert_eq!(backend.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_rerun_with_deterministic_backend_is_stable() {
        let server = resume_host().await;
        let backend = Arc::new(
            StubBackend::replying(&reply(55, false)).with_reply("resume of bob", &reply(88, true)),
        );
        let applicants = vec![
            applicant("a", Some(format!("{}/alice.txt", server.uri()))),
            applicant("b", Some(format!("{}/bob.txt", server.uri()))),
            applicant("c", Some(format!("{}/carol.txt", server.uri()))),
        ];
        let pipeline = pipeline(backend, 3);

        let first = pipeline.run(applicants.clone(), "JD").await.unwrap();
        let second = pipeline.run(applicants, "JD").await.unwrap();
        assert_eq!(first.outcomes, second.outcomes);
    }

    /// Answers later applicants faster than earlier ones.
    struct SlowFirstBackend;

    #[async_trait]
    impl GenerativeBackend for SlowFirstBackend {
        async fn generate(&self, prompt: &str, _system: Option<&str>) -> Result<String, LlmError> {
            let delay = if prompt.contains("resume of alice") { 60 } else { 5 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(reply(50, true))
        }

        fn model_name(&self) -> &str {
            "slow-first"
        }
    }

    #[tokio::test]
    async fn test_outcomes_keep_input_order_under_concurrency() {
        let server = resume_host().await;
        let applicants = vec![
            applicant("first", Some(format!("{}/alice.txt", server.uri()))),
            applicant("second", Some(format!("{}/bob.txt", server.uri()))),
            applicant("third", Some(format!("{}/carol.txt", server.uri()))),
        ];

        let report = pipeline(Arc::new(SlowFirstBackend), 3)
            .run(applicants, "JD")
            .await
            .unwrap();
        let ids: Vec<_> = report.outcomes.iter().map(|o| o.application_id()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }
}
