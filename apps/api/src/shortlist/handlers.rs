//! Axum route handler for AI shortlisting.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, info};

use crate::shortlist::models::{ShortlistRequest, ShortlistResponse};
use crate::shortlist::pipeline::{ShortlistError, ShortlistPipeline};
use crate::state::AppState;

pub const FAILURE_MESSAGE: &str = "An error occurred while processing the applicants";

impl IntoResponse for ShortlistError {
    fn into_response(self) -> Response {
        let status = match &self {
            ShortlistError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ShortlistError::Batch(_) => {
                error!("Shortlisting batch failed: {self}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(json!({
            "success": false,
            "message": FAILURE_MESSAGE,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// POST /api/v1/ai/shortlist
///
/// Scores every applicant against the job description and returns one outcome per
/// applicant in request order. Filtering on `consider` is left to the caller.
pub async fn handle_shortlist(
    State(state): State<AppState>,
    payload: Result<Json<ShortlistRequest>, JsonRejection>,
) -> Result<Json<ShortlistResponse>, ShortlistError> {
    let Json(request) = payload.map_err(|e| ShortlistError::InvalidRequest(e.body_text()))?;

    info!(
        "Shortlisting {} applicants (concurrency {})",
        request.applicants.len(),
        state.config.shortlist_concurrency
    );

    let pipeline = ShortlistPipeline::new(
        state.fetcher.clone(),
        state.llm.clone(),
        state.config.shortlist_concurrency,
    );
    let report = pipeline
        .run(request.applicants, &request.job_description)
        .await?;

    Ok(Json(report.into_response()))
}
