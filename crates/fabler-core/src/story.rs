//! Persisted story records.
//!
//! A story's node graph is stored arena-style: a flat set of nodes keyed by
//! identifier, with options referencing their child node by identifier. This
//! keeps ownership flat and lets the whole tree be written in one batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted branching narrative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    /// Story identifier, assigned at materialization.
    pub id: Uuid,
    /// Story title from the generative response.
    pub title: String,
    /// Session that requested the story.
    pub session_id: Uuid,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// One point in a narrative: an ending, or a branching point with options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryNode {
    /// Node identifier, unique within the story.
    pub id: Uuid,
    /// Owning story.
    pub story_id: Uuid,
    /// Narrative text shown to the reader.
    pub content: String,
    /// Exactly one node per story carries this marker.
    pub is_root: bool,
    /// Terminal nodes have no options.
    pub is_ending: bool,
    /// Meaningful only when `is_ending` is set.
    pub is_winning_ending: bool,
    /// Reader choices in display order. Empty iff `is_ending`.
    pub options: Vec<StoryOption>,
}

/// One reader choice leading to exactly one child node of the same story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryOption {
    /// Choice text shown to the reader.
    pub text: String,
    /// The node this choice leads to.
    pub next_node_id: Uuid,
}
