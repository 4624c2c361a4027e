//! PostgreSQL implementation of the `JobRepository` trait.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use fabler_core::error::EngineError;
use fabler_core::job::{Job, JobStatus};
use fabler_core::repository::JobRepository;

/// PostgreSQL-backed job repository.
#[derive(Debug, Clone)]
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    /// Creates a new `PgJobRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn status_str(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => "pending",
        JobStatus::Processing => "processing",
        JobStatus::Completed => "completed",
        JobStatus::Failed => "failed",
    }
}

fn parse_status(raw: &str) -> Result<JobStatus, EngineError> {
    match raw {
        "pending" => Ok(JobStatus::Pending),
        "processing" => Ok(JobStatus::Processing),
        "completed" => Ok(JobStatus::Completed),
        "failed" => Ok(JobStatus::Failed),
        other => Err(EngineError::Storage(format!(
            "unknown job status {other:?} in store"
        ))),
    }
}

fn storage_err(e: sqlx::Error) -> EngineError {
    EngineError::Storage(e.to_string())
}

fn job_from_row(row: &PgRow) -> Result<Job, EngineError> {
    let status: String = row.try_get("status").map_err(storage_err)?;
    Ok(Job {
        job_id: row.try_get("job_id").map_err(storage_err)?,
        session_id: row.try_get("session_id").map_err(storage_err)?,
        theme: row.try_get("theme").map_err(storage_err)?,
        status: parse_status(&status)?,
        story_id: row.try_get("story_id").map_err(storage_err)?,
        error: row.try_get("error").map_err(storage_err)?,
        created_at: row.try_get("created_at").map_err(storage_err)?,
        completed_at: row.try_get("completed_at").map_err(storage_err)?,
    })
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn insert_job(&self, job: &Job) -> Result<(), EngineError> {
        sqlx::query(
            "INSERT INTO story_jobs
                 (job_id, session_id, theme, status, story_id, error, created_at, completed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(job.job_id)
        .bind(job.session_id)
        .bind(&job.theme)
        .bind(status_str(job.status))
        .bind(job.story_id)
        .bind(&job.error)
        .bind(job.created_at)
        .bind(job.completed_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn update_job(&self, job: &Job) -> Result<(), EngineError> {
        let result = sqlx::query(
            "UPDATE story_jobs
             SET status = $2, story_id = $3, error = $4, completed_at = $5
             WHERE job_id = $1",
        )
        .bind(job.job_id)
        .bind(status_str(job.status))
        .bind(job.story_id)
        .bind(&job.error)
        .bind(job.completed_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(EngineError::Storage(format!(
                "update of unknown job {}",
                job.job_id
            )));
        }
        Ok(())
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<Job>, EngineError> {
        let row = sqlx::query(
            "SELECT job_id, session_id, theme, status, story_id, error, created_at, completed_at
             FROM story_jobs
             WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        row.as_ref().map(job_from_row).transpose()
    }
}
