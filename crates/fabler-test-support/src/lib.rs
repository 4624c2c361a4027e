//! Shared test mocks and utilities for the Fabler story engine.

mod clock;
mod generator;
mod repository;

pub use clock::FixedClock;
pub use generator::{FailingGenerator, StubGenerator, linear_blueprint, two_branch_blueprint};
pub use repository::{
    FailingJobRepository, FailingStoryRepository, InMemoryJobRepository, InMemoryStoryRepository,
};
