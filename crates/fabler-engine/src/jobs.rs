//! Job submission and status queries.
//!
//! These are the two job operations reachable from the request path. Every
//! lifecycle transition after submission belongs to [`crate::runner`].

use tracing::info;
use uuid::Uuid;

use fabler_core::clock::Clock;
use fabler_core::error::EngineError;
use fabler_core::job::Job;
use fabler_core::repository::JobRepository;

/// Creates a `Pending` job for the given session and theme and persists it.
///
/// # Errors
///
/// Returns `EngineError::Storage` if the insert fails.
pub async fn submit(
    repo: &dyn JobRepository,
    clock: &dyn Clock,
    session_id: Uuid,
    theme: String,
) -> Result<Job, EngineError> {
    let job = Job::new(session_id, theme, clock);
    repo.insert_job(&job).await?;
    info!(job_id = %job.job_id, session_id = %session_id, "job submitted");
    Ok(job)
}

/// Loads a job for status polling.
///
/// # Errors
///
/// Returns `EngineError::JobNotFound` for unknown identifiers and
/// `EngineError::Storage` if the read fails.
pub async fn get_status(repo: &dyn JobRepository, job_id: Uuid) -> Result<Job, EngineError> {
    repo.find_job(job_id)
        .await?
        .ok_or(EngineError::JobNotFound(job_id))
}
