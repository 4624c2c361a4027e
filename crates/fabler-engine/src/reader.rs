//! Tree assembly — reconstructing a persisted story into one nested
//! response.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use fabler_core::error::EngineError;
use fabler_core::repository::StoryRepository;
use fabler_core::story::StoryOption;

/// A full story tree in one response: the node arena keyed by identifier,
/// with the root called out. Options reference their target node by
/// identifier rather than embedding a copy.
#[derive(Debug, Serialize)]
pub struct CompleteStory {
    /// Story identifier.
    pub id: Uuid,
    /// Story title.
    pub title: String,
    /// Session that requested the story.
    pub session_id: Uuid,
    /// Creation time.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Identifier of the unique root node.
    pub root_node_id: Uuid,
    /// Every node of the story, keyed by identifier.
    pub all_nodes: HashMap<Uuid, CompleteNode>,
}

/// Flattened view of one node for client consumption.
#[derive(Debug, Serialize)]
pub struct CompleteNode {
    /// Node identifier.
    pub id: Uuid,
    /// Narrative text.
    pub content: String,
    /// Whether this node ends the story.
    pub is_ending: bool,
    /// Whether this ending is a successful outcome.
    pub is_winning_ending: bool,
    /// Reader choices in render order.
    pub options: Vec<StoryOption>,
}

/// Loads a story and all of its nodes and assembles the nested response.
///
/// # Errors
///
/// - `EngineError::StoryNotFound` for unknown identifiers.
/// - `EngineError::Internal` if the story's nodes contain no root marker,
///   which indicates a materialization bug; a partial tree is never
///   returned silently.
/// - `EngineError::Storage` if a read fails.
pub async fn assemble(
    repo: &dyn StoryRepository,
    story_id: Uuid,
) -> Result<CompleteStory, EngineError> {
    let story = repo
        .find_story(story_id)
        .await?
        .ok_or(EngineError::StoryNotFound(story_id))?;

    let nodes = repo.load_nodes(story_id).await?;

    let root_node_id = nodes
        .iter()
        .find(|node| node.is_root)
        .map(|node| node.id)
        .ok_or_else(|| EngineError::Internal(format!("story {story_id} has no root node")))?;

    let all_nodes = nodes
        .into_iter()
        .map(|node| {
            (
                node.id,
                CompleteNode {
                    id: node.id,
                    content: node.content,
                    is_ending: node.is_ending,
                    is_winning_ending: node.is_winning_ending,
                    options: node.options,
                },
            )
        })
        .collect();

    Ok(CompleteStory {
        id: story.id,
        title: story.title,
        session_id: story.session_id,
        created_at: story.created_at,
        root_node_id,
        all_nodes,
    })
}
