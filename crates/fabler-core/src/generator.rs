//! The generative collaborator contract.

use async_trait::async_trait;

use crate::blueprint::StoryBlueprint;
use crate::error::EngineError;

/// A single call to an external text-generating capability.
///
/// Implementations must hand back a blueprint that already passed
/// [`StoryBlueprint::validate`]. The adapter is the trust boundary where
/// untrusted model output is sanitized, so downstream consumers never
/// re-check shape.
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    /// Generates a branching story for the given theme.
    ///
    /// # Errors
    ///
    /// `EngineError::GenerationFailed` for network, timeout, or model
    /// errors; `EngineError::Validation` when the response fails schema
    /// validation.
    async fn generate(&self, theme: &str) -> Result<StoryBlueprint, EngineError>;
}
