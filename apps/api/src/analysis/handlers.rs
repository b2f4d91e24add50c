//! Axum route handlers for single-resume analysis and job-description generation.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{info, warn};

use crate::analysis::job_description::{
    generate_job_description, JobDescriptionRequest, JobDescriptionResponse,
};
use crate::analysis::resume_analysis::{
    analyze_resume, ResumeAnalysisRequest, ResumeAnalysisResponse,
};
use crate::errors::AppError;
use crate::llm_client::LlmError;
use crate::state::AppState;

pub const INVALID_MODEL_JSON: &str = "Invalid JSON response from model";

/// POST /api/v1/ai/resume-analysis
///
/// Unparseable model output is answered with 502 and the raw text so the
/// caller can display or log what the model said.
pub async fn handle_resume_analysis(
    State(state): State<AppState>,
    Json(request): Json<ResumeAnalysisRequest>,
) -> Result<Response, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resumeText is required".to_string()));
    }
    info!("Analyzing resume ({} chars)", request.resume_text.len());

    match analyze_resume(state.llm.as_ref(), &request.resume_text, &request.job).await {
        Ok(analysis) => Ok(Json(ResumeAnalysisResponse { analysis }).into_response()),
        Err(LlmError::Parse(err)) => {
            warn!("Resume analysis returned unparseable output: {}", err.last_error);
            let body = Json(json!({ "error": INVALID_MODEL_JSON, "raw": err.raw }));
            Ok((StatusCode::BAD_GATEWAY, body).into_response())
        }
        Err(e) => Err(AppError::Llm(format!("Resume analysis failed: {e}"))),
    }
}

/// POST /api/v1/ai/generate-job-description
pub async fn handle_generate_job_description(
    State(state): State<AppState>,
    Json(request): Json<JobDescriptionRequest>,
) -> Result<Json<JobDescriptionResponse>, AppError> {
    let response = generate_job_description(state.llm.as_ref(), &request).await?;
    Ok(Json(response))
}
