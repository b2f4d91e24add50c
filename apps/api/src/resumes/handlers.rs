//! Axum route handlers for resume extraction and lookup.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeProfileRow;
use crate::resumes::extract::extract_resume;
use crate::resumes::store::{get_profile, upsert_profile};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResumeRequest {
    #[serde(alias = "user_id")]
    pub user_id: Uuid,
    #[serde(default)]
    pub resume_url: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResumeResponse {
    pub success: bool,
    pub resume: ResumeProfileRow,
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    #[serde(alias = "userId")]
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ResumeLookupResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub resume: Option<ResumeProfileRow>,
}

/// POST /api/v1/ai/extract-resume
///
/// Parses the user's resume into a structured profile and upserts it.
pub async fn handle_extract_resume(
    State(state): State<AppState>,
    Json(request): Json<ExtractResumeRequest>,
) -> Result<Json<ExtractResumeResponse>, AppError> {
    let resume_url = request.resume_url.trim();
    if resume_url.is_empty() {
        return Err(AppError::Validation("resumeUrl is required".to_string()));
    }

    let parsed = extract_resume(&state.fetcher, state.llm.as_ref(), resume_url).await?;

    let resume = upsert_profile(
        &state.db,
        request.user_id,
        resume_url,
        &parsed,
        state.llm.model_name(),
    )
    .await?;
    info!("Stored resume profile for user {}", request.user_id);

    Ok(Json(ExtractResumeResponse {
        success: true,
        resume,
    }))
}

/// GET /api/v1/resumes?user_id=
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeLookupResponse>, AppError> {
    let resume = get_profile(&state.db, params.user_id).await?;
    let message = resume
        .is_none()
        .then(|| "No resume found".to_string());
    Ok(Json(ResumeLookupResponse { message, resume }))
}
