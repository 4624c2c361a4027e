//! The job runner — one background execution per submitted job.
//!
//! The runner is the failure boundary: every error raised while generating
//! or materializing is converted into the job's terminal `Failed` state with
//! a human-readable reason. Nothing escapes to the submitter, who has
//! already disconnected.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use uuid::Uuid;

use fabler_core::clock::Clock;
use fabler_core::error::EngineError;
use fabler_core::generator::StoryGenerator;
use fabler_core::job::Job;
use fabler_core::repository::{JobRepository, StoryRepository};

use crate::materializer::materialize;

/// Drives one job from `Pending` to a terminal state.
///
/// Holds its collaborators behind `Arc` so a clone can be moved onto the
/// spawned task; the durable job record is the only state shared with the
/// submitting path.
#[derive(Clone)]
pub struct JobRunner {
    jobs: Arc<dyn JobRepository>,
    stories: Arc<dyn StoryRepository>,
    generator: Arc<dyn StoryGenerator>,
    clock: Arc<dyn Clock>,
    generation_timeout: Option<Duration>,
}

impl JobRunner {
    /// Creates a runner with no generation timeout.
    #[must_use]
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        stories: Arc<dyn StoryRepository>,
        generator: Arc<dyn StoryGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            jobs,
            stories,
            generator,
            clock,
            generation_timeout: None,
        }
    }

    /// Bounds the generator call. Expiry is indistinguishable from any other
    /// generation failure and routes to `fail`.
    #[must_use]
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = Some(timeout);
        self
    }

    /// Runs one job to its terminal state. Steps are strictly sequential
    /// per job, with each transition committed before the next step
    /// proceeds. Never retries.
    pub async fn run(&self, job_id: Uuid) {
        let mut job = match self.jobs.find_job(job_id).await {
            Ok(Some(job)) => job,
            Ok(None) => {
                // Never durably visible or externally purged; not fatal.
                warn!(job_id = %job_id, "job vanished before processing");
                return;
            }
            Err(err) => {
                error!(job_id = %job_id, error = %err, "failed to load job");
                return;
            }
        };

        if let Err(err) = self.begin(&mut job).await {
            error!(job_id = %job_id, error = %err, "failed to begin job");
            return;
        }

        match self.execute(&job).await {
            Ok(story_id) => self.record_success(&mut job, story_id).await,
            Err(err) => self.record_failure(&mut job, &err).await,
        }
    }

    async fn begin(&self, job: &mut Job) -> Result<(), EngineError> {
        job.begin()?;
        self.jobs.update_job(job).await?;
        info!(job_id = %job.job_id, "job processing");
        Ok(())
    }

    /// The fallible middle of the pipeline: generate, then materialize.
    async fn execute(&self, job: &Job) -> Result<Uuid, EngineError> {
        let blueprint = match self.generation_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.generator.generate(&job.theme))
                .await
                .map_err(|_| {
                    EngineError::GenerationFailed(format!(
                        "generation timed out after {}s",
                        timeout.as_secs()
                    ))
                })??,
            None => self.generator.generate(&job.theme).await?,
        };

        let story = materialize(
            self.stories.as_ref(),
            self.clock.as_ref(),
            job.session_id,
            &blueprint,
        )
        .await?;
        Ok(story.id)
    }

    async fn record_success(&self, job: &mut Job, story_id: Uuid) {
        if let Err(err) = self.finish(job, |job, clock| job.succeed(story_id, clock)).await {
            error!(job_id = %job.job_id, error = %err, "failed to record job success");
            return;
        }
        info!(job_id = %job.job_id, story_id = %story_id, "job completed");
    }

    async fn record_failure(&self, job: &mut Job, cause: &EngineError) {
        warn!(job_id = %job.job_id, error = %cause, "job failed");
        let reason = cause.to_string();
        if let Err(err) = self.finish(job, |job, clock| job.fail(reason, clock)).await {
            error!(job_id = %job.job_id, error = %err, "failed to record job failure");
        }
    }

    async fn finish<F>(&self, job: &mut Job, transition: F) -> Result<(), EngineError>
    where
        F: FnOnce(&mut Job, &dyn Clock) -> Result<(), EngineError>,
    {
        transition(job, self.clock.as_ref())?;
        self.jobs.update_job(job).await
    }
}
