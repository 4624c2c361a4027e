//! Fabler Store — PostgreSQL implementations of the storage traits.

pub mod pg_job_repository;
pub mod pg_story_repository;
pub mod schema;

pub use pg_job_repository::PgJobRepository;
pub use pg_story_repository::PgStoryRepository;
