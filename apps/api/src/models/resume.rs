use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One row of `resume_profiles`: the latest structured parse of a user's resume.
///
/// ```sql
/// CREATE TABLE resume_profiles (
///     id              UUID PRIMARY KEY,
///     user_id         UUID NOT NULL UNIQUE,
///     resume_url      TEXT NOT NULL,
///     personal        JSONB NOT NULL,
///     education       JSONB NOT NULL,
///     projects        JSONB NOT NULL,
///     work_experience JSONB NOT NULL,
///     parsed_at       TIMESTAMPTZ NOT NULL,
///     model_used      TEXT NOT NULL
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume_url: String,
    pub personal: Value,
    pub education: Value,
    pub projects: Value,
    pub work_experience: Value,
    pub parsed_at: DateTime<Utc>,
    pub model_used: String,
}
