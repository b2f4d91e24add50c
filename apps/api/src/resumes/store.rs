//! Persistence for parsed resume profiles (one row per user, upserted).

use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::ResumeProfileRow;
use crate::resumes::extract::ParsedResume;

/// Inserts or replaces the user's resume profile and returns the stored row.
pub async fn upsert_profile(
    pool: &PgPool,
    user_id: Uuid,
    resume_url: &str,
    parsed: &ParsedResume,
    model_used: &str,
) -> Result<ResumeProfileRow, sqlx::Error> {
    sqlx::query_as::<_, ResumeProfileRow>(
        r#"
        INSERT INTO resume_profiles
            (id, user_id, resume_url, personal, education, projects,
             work_experience, parsed_at, model_used)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (user_id) DO UPDATE SET
            resume_url = EXCLUDED.resume_url,
            personal = EXCLUDED.personal,
            education = EXCLUDED.education,
            projects = EXCLUDED.projects,
            work_experience = EXCLUDED.work_experience,
            parsed_at = EXCLUDED.parsed_at,
            model_used = EXCLUDED.model_used
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(resume_url)
    .bind(Json(&parsed.personal))
    .bind(Json(&parsed.education))
    .bind(Json(&parsed.projects))
    .bind(Json(&parsed.work_experience))
    .bind(Utc::now())
    .bind(model_used)
    .fetch_one(pool)
    .await
}

pub async fn get_profile(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<ResumeProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeProfileRow>("SELECT * FROM resume_profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}
