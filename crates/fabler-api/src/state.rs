//! Shared application state.

use std::sync::Arc;

use fabler_core::clock::Clock;
use fabler_core::repository::{JobRepository, StoryRepository};
use fabler_engine::runner::JobRunner;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Job storage, used by submission and polling.
    pub jobs: Arc<dyn JobRepository>,
    /// Story storage, used by tree fetch.
    pub stories: Arc<dyn StoryRepository>,
    /// Runner driving background generation; cloned onto a task per job.
    pub runner: JobRunner,
    /// Time source.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        stories: Arc<dyn StoryRepository>,
        runner: JobRunner,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            jobs,
            stories,
            runner,
            clock,
        }
    }
}
