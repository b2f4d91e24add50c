pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::resumes::handlers as resumes;
use crate::shortlist::handlers as shortlist;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/ready", get(health::readiness_handler))
        // AI endpoints
        .route("/api/v1/ai/shortlist", post(shortlist::handle_shortlist))
        .route(
            "/api/v1/ai/resume-analysis",
            post(analysis::handle_resume_analysis),
        )
        .route(
            "/api/v1/ai/generate-job-description",
            post(analysis::handle_generate_job_description),
        )
        .route(
            "/api/v1/ai/extract-resume",
            post(resumes::handle_extract_resume),
        )
        // Stored resume profiles
        .route("/api/v1/resumes", get(resumes::handle_get_resume))
        .with_state(state)
}
