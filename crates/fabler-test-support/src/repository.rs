//! Test repositories — in-memory and always-failing implementations of the
//! storage traits.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use fabler_core::error::EngineError;
use fabler_core::job::Job;
use fabler_core::repository::{JobRepository, StoryRepository};
use fabler_core::story::{Story, StoryNode};
use uuid::Uuid;

/// A job repository backed by a `HashMap`. Suitable for unit and API
/// integration tests; writes are visible immediately.
#[derive(Debug, Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<HashMap<Uuid, Job>>,
}

impl InMemoryJobRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn insert_job(&self, job: &Job) -> Result<(), EngineError> {
        self.jobs.lock().unwrap().insert(job.job_id, job.clone());
        Ok(())
    }

    async fn update_job(&self, job: &Job) -> Result<(), EngineError> {
        let mut jobs = self.jobs.lock().unwrap();
        if !jobs.contains_key(&job.job_id) {
            return Err(EngineError::Storage(format!(
                "update of unknown job {}",
                job.job_id
            )));
        }
        jobs.insert(job.job_id, job.clone());
        Ok(())
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<Job>, EngineError> {
        Ok(self.jobs.lock().unwrap().get(&job_id).cloned())
    }
}

/// A story repository backed by `HashMap`s, honoring the all-or-nothing
/// contract of `insert_story_tree` trivially (one lock, one insert).
#[derive(Debug, Default)]
pub struct InMemoryStoryRepository {
    stories: Mutex<HashMap<Uuid, Story>>,
    nodes: Mutex<HashMap<Uuid, Vec<StoryNode>>>,
}

impl InMemoryStoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted stories. Lets tests assert that a failed
    /// materialization committed nothing.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn story_count(&self) -> usize {
        self.stories.lock().unwrap().len()
    }

    /// Inserts nodes for a story without a story record, to set up
    /// consistency-violation scenarios.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn put_raw_nodes(&self, story: Story, nodes: Vec<StoryNode>) {
        self.stories.lock().unwrap().insert(story.id, story);
        let story_id = nodes.first().map(|n| n.story_id);
        if let Some(story_id) = story_id {
            self.nodes.lock().unwrap().insert(story_id, nodes);
        }
    }
}

#[async_trait]
impl StoryRepository for InMemoryStoryRepository {
    async fn insert_story_tree(
        &self,
        story: &Story,
        nodes: &[StoryNode],
    ) -> Result<(), EngineError> {
        self.stories.lock().unwrap().insert(story.id, story.clone());
        self.nodes.lock().unwrap().insert(story.id, nodes.to_vec());
        Ok(())
    }

    async fn find_story(&self, story_id: Uuid) -> Result<Option<Story>, EngineError> {
        Ok(self.stories.lock().unwrap().get(&story_id).cloned())
    }

    async fn load_nodes(&self, story_id: Uuid) -> Result<Vec<StoryNode>, EngineError> {
        Ok(self
            .nodes
            .lock()
            .unwrap()
            .get(&story_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// A job repository that always returns a storage error. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingJobRepository;

#[async_trait]
impl JobRepository for FailingJobRepository {
    async fn insert_job(&self, _job: &Job) -> Result<(), EngineError> {
        Err(EngineError::Storage("connection refused".into()))
    }

    async fn update_job(&self, _job: &Job) -> Result<(), EngineError> {
        Err(EngineError::Storage("connection refused".into()))
    }

    async fn find_job(&self, _job_id: Uuid) -> Result<Option<Job>, EngineError> {
        Err(EngineError::Storage("connection refused".into()))
    }
}

/// A story repository that always returns a storage error.
#[derive(Debug)]
pub struct FailingStoryRepository;

#[async_trait]
impl StoryRepository for FailingStoryRepository {
    async fn insert_story_tree(
        &self,
        _story: &Story,
        _nodes: &[StoryNode],
    ) -> Result<(), EngineError> {
        Err(EngineError::Storage("connection refused".into()))
    }

    async fn find_story(&self, _story_id: Uuid) -> Result<Option<Story>, EngineError> {
        Err(EngineError::Storage("connection refused".into()))
    }

    async fn load_nodes(&self, _story_id: Uuid) -> Result<Vec<StoryNode>, EngineError> {
        Err(EngineError::Storage("connection refused".into()))
    }
}
