//! Story submission and tree fetch routes.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get, routing::post};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use fabler_engine::reader::{self, CompleteStory};
use fabler_engine::jobs;

use crate::error::ApiError;
use crate::routes::jobs::JobResponse;
use crate::state::AppState;

/// Request body for POST /create.
#[derive(Debug, Deserialize)]
pub struct CreateStoryRequest {
    /// Thematic prompt to generate from.
    pub theme: String,
    /// Session identifier; a fresh one is minted when absent.
    pub session_id: Option<Uuid>,
}

/// POST /create
///
/// Creates a `Pending` job, hands it to the runner on its own task, and
/// returns immediately. Generation happens out of band; clients poll
/// `GET /api/jobs/{job_id}`.
#[instrument(skip(state, request), fields(theme_len = request.theme.len()))]
async fn create_story(
    State(state): State<AppState>,
    Json(request): Json<CreateStoryRequest>,
) -> Result<Json<JobResponse>, ApiError> {
    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);

    let job = jobs::submit(
        state.jobs.as_ref(),
        state.clock.as_ref(),
        session_id,
        request.theme,
    )
    .await?;

    info!(job_id = %job.job_id, "spawning story generation");
    let runner = state.runner.clone();
    let job_id = job.job_id;
    tokio::spawn(async move { runner.run(job_id).await });

    Ok(Json(job.into()))
}

/// GET /{story_id}/complete
#[instrument(skip(state))]
async fn get_complete_story(
    State(state): State<AppState>,
    Path(story_id): Path<Uuid>,
) -> Result<Json<CompleteStory>, ApiError> {
    let complete = reader::assemble(state.stories.as_ref(), story_id).await?;
    Ok(Json(complete))
}

/// Returns the router for story creation and retrieval.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_story))
        .route("/{story_id}/complete", get(get_complete_story))
}
