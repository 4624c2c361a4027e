//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for the story engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The generative model returned a structurally invalid response.
    #[error("validation error: {0}")]
    Validation(String),

    /// The external generative call errored or timed out.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// A generated tree exceeded the depth or node-count guard.
    #[error("structural limit exceeded: {0}")]
    StructuralLimitExceeded(String),

    /// A persistence failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// No job exists with the given identifier.
    #[error("job not found: {0}")]
    JobNotFound(Uuid),

    /// No story exists with the given identifier.
    #[error("story not found: {0}")]
    StoryNotFound(Uuid),

    /// An internal consistency violation, such as a persisted story with no
    /// root node. Indicates a bug, not a user error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Whether this error is one of the not-found read outcomes.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::JobNotFound(_) | Self::StoryNotFound(_))
    }
}
