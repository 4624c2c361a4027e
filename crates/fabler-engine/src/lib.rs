//! Fabler Engine — the asynchronous story generation pipeline.
//!
//! Submission creates a `Pending` job and returns immediately; a
//! [`runner::JobRunner`] then drives the job through generation and
//! materialization on its own task, with the job record as the only state
//! shared with the submitting path. Clients poll job status and, once the
//! job completes, fetch the assembled tree.

pub mod jobs;
pub mod materializer;
pub mod reader;
pub mod runner;
