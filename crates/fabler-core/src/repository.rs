//! Storage abstractions.
//!
//! The engine talks to storage only through these traits. Absent rows come
//! back as `Ok(None)` so callers decide whether not-found is an error;
//! infrastructure failures surface as `EngineError::Storage`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::EngineError;
use crate::job::Job;
use crate::story::{Story, StoryNode};

/// Repository for job records. The job runner is the only writer after
/// submission; polling reads never mutate.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Persists a newly submitted job.
    async fn insert_job(&self, job: &Job) -> Result<(), EngineError>;

    /// Persists the current state of an existing job. Each lifecycle
    /// transition is committed through this before the runner proceeds.
    async fn update_job(&self, job: &Job) -> Result<(), EngineError>;

    /// Loads a job by identifier.
    async fn find_job(&self, job_id: Uuid) -> Result<Option<Job>, EngineError>;
}

/// Repository for story trees, written once at materialization.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Persists a story and its complete node set in one all-or-nothing
    /// write. On failure nothing is visible.
    async fn insert_story_tree(
        &self,
        story: &Story,
        nodes: &[StoryNode],
    ) -> Result<(), EngineError>;

    /// Loads a story record by identifier.
    async fn find_story(&self, story_id: Uuid) -> Result<Option<Story>, EngineError>;

    /// Loads every node belonging to a story, options included.
    async fn load_nodes(&self, story_id: Uuid) -> Result<Vec<StoryNode>, EngineError>;
}
