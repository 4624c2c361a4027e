//! Job polling routes.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use fabler_core::job::{Job, JobStatus};
use fabler_engine::jobs;

use crate::error::ApiError;
use crate::state::AppState;

/// Client-facing view of a job.
#[derive(Debug, Serialize)]
pub struct JobResponse {
    /// Job identifier to poll with.
    pub job_id: Uuid,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// Identifier of the produced story, once completed.
    pub story_id: Option<Uuid>,
    /// Failure reason, once failed.
    pub error: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Time the job reached a terminal state.
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.job_id,
            status: job.status,
            story_id: job.story_id,
            error: job.error,
            created_at: job.created_at,
            completed_at: job.completed_at,
        }
    }
}

/// GET /{job_id}
#[instrument(skip(state))]
async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobResponse>, ApiError> {
    let job = jobs::get_status(state.jobs.as_ref(), job_id).await?;
    Ok(Json(job.into()))
}

/// Returns the router for job polling.
pub fn router() -> Router<AppState> {
    Router::new().route("/{job_id}", get(get_job_status))
}
