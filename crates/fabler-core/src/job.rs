//! The Job record and its lifecycle state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::EngineError;

/// Lifecycle state of a story-generation job.
///
/// Transitions are monotonic and one-directional:
/// `Pending → Processing → {Completed, Failed}`. `Completed` and `Failed`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created, not yet picked up by the runner.
    Pending,
    /// The runner is driving generation and materialization.
    Processing,
    /// A story was produced; `story_id` is set.
    Completed,
    /// Generation or materialization failed; `error` is set.
    Failed,
}

impl JobStatus {
    /// Whether this state admits no further transitions.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One tracked unit of asynchronous story generation.
///
/// The job runner is the only writer of a job after submission; the status
/// methods below reject every transition the lifecycle does not admit, so a
/// replayed `succeed` or `fail` can never double-apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Job identifier, independent of any story identifier.
    pub job_id: Uuid,
    /// Session that submitted the job.
    pub session_id: Uuid,
    /// The thematic prompt to generate from.
    pub theme: String,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// Identifier of the produced story. Present iff `Completed`.
    pub story_id: Option<Uuid>,
    /// Failure reason. Present iff `Failed`.
    pub error: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Time the job reached a terminal state.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Creates a new `Pending` job.
    #[must_use]
    pub fn new(session_id: Uuid, theme: String, clock: &dyn Clock) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            session_id,
            theme,
            status: JobStatus::Pending,
            story_id: None,
            error: None,
            created_at: clock.now(),
            completed_at: None,
        }
    }

    fn transition(&mut self, from: JobStatus, to: JobStatus) -> Result<(), EngineError> {
        if self.status != from {
            return Err(EngineError::Validation(format!(
                "illegal job transition {:?} -> {to:?} for job {}",
                self.status, self.job_id
            )));
        }
        self.status = to;
        Ok(())
    }

    /// `Pending → Processing`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Validation` if the job is not `Pending`.
    pub fn begin(&mut self) -> Result<(), EngineError> {
        self.transition(JobStatus::Pending, JobStatus::Processing)
    }

    /// `Processing → Completed`, recording the story identifier.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Validation` if the job is not `Processing`.
    pub fn succeed(&mut self, story_id: Uuid, clock: &dyn Clock) -> Result<(), EngineError> {
        self.transition(JobStatus::Processing, JobStatus::Completed)?;
        self.story_id = Some(story_id);
        self.completed_at = Some(clock.now());
        Ok(())
    }

    /// `Processing → Failed`, recording the failure reason.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Validation` if the job is not `Processing`.
    pub fn fail(&mut self, reason: String, clock: &dyn Clock) -> Result<(), EngineError> {
        self.transition(JobStatus::Processing, JobStatus::Failed)?;
        self.error = Some(reason);
        self.completed_at = Some(clock.now());
        Ok(())
    }
}
