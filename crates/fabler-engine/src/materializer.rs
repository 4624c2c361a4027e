//! Tree materialization — converting one validated blueprint into a
//! persisted story.
//!
//! The blueprint is flattened depth-first into arena rows (flat nodes keyed
//! by identifier, options referencing children by identifier) entirely in
//! memory, then handed to the repository as one all-or-nothing write. A
//! depth or node-count breach therefore commits nothing.

use tracing::info;
use uuid::Uuid;

use fabler_core::blueprint::{NodeBlueprint, StoryBlueprint};
use fabler_core::clock::Clock;
use fabler_core::error::EngineError;
use fabler_core::repository::StoryRepository;
use fabler_core::story::{Story, StoryNode, StoryOption};

/// Maximum depth of a materialized tree, root at depth 1.
pub const MAX_TREE_DEPTH: usize = 16;

/// Maximum number of nodes in a materialized tree.
pub const MAX_TREE_NODES: usize = 256;

/// Materializes a blueprint into a persisted story tree.
///
/// Node identifiers are assigned here rather than by storage, so option rows
/// can reference their child before anything is committed. Option order is
/// preserved; it is the order clients render choices in.
///
/// # Errors
///
/// - `EngineError::Validation` if the blueprint violates the ending/option
///   structure (a misbehaving generator must not reach storage).
/// - `EngineError::StructuralLimitExceeded` if the tree breaches
///   [`MAX_TREE_DEPTH`] or [`MAX_TREE_NODES`].
/// - `EngineError::Storage` if the write fails. In every error case no
///   partial story is visible.
pub async fn materialize(
    repo: &dyn StoryRepository,
    clock: &dyn Clock,
    session_id: Uuid,
    blueprint: &StoryBlueprint,
) -> Result<Story, EngineError> {
    blueprint.validate()?;

    let story = Story {
        id: Uuid::new_v4(),
        title: blueprint.title.clone(),
        session_id,
        created_at: clock.now(),
    };

    let mut nodes = Vec::new();
    flatten(&blueprint.root_node, story.id, true, 1, &mut nodes)?;

    repo.insert_story_tree(&story, &nodes).await?;
    info!(story_id = %story.id, nodes = nodes.len(), "story materialized");
    Ok(story)
}

/// Flattens `blueprint` and its descendants into `nodes`, returning the
/// identifier assigned to `blueprint` itself. The parent row is pushed before its
/// children so rows appear in document order.
fn flatten(
    blueprint: &NodeBlueprint,
    story_id: Uuid,
    is_root: bool,
    depth: usize,
    nodes: &mut Vec<StoryNode>,
) -> Result<Uuid, EngineError> {
    if depth > MAX_TREE_DEPTH {
        return Err(EngineError::StructuralLimitExceeded(format!(
            "tree depth exceeds {MAX_TREE_DEPTH}"
        )));
    }
    if nodes.len() >= MAX_TREE_NODES {
        return Err(EngineError::StructuralLimitExceeded(format!(
            "tree exceeds {MAX_TREE_NODES} nodes"
        )));
    }

    let node_id = Uuid::new_v4();
    let index = nodes.len();
    nodes.push(StoryNode {
        id: node_id,
        story_id,
        content: blueprint.content.clone(),
        is_root,
        is_ending: blueprint.is_ending,
        is_winning_ending: blueprint.is_winning_ending,
        options: Vec::new(),
    });

    let mut options = Vec::with_capacity(blueprint.options.len());
    for option in &blueprint.options {
        let child_id = flatten(&option.next_node, story_id, false, depth + 1, nodes)?;
        options.push(StoryOption {
            text: option.text.clone(),
            next_node_id: child_id,
        });
    }
    nodes[index].options = options;

    Ok(node_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fabler_core::blueprint::OptionBlueprint;
    use fabler_test_support::{
        FailingStoryRepository, FixedClock, InMemoryStoryRepository, two_branch_blueprint,
    };

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    /// A linear chain of `depth` nodes ending in a winning ending.
    fn chain_blueprint(depth: usize) -> StoryBlueprint {
        let mut node = NodeBlueprint {
            content: "The end.".into(),
            is_ending: true,
            is_winning_ending: true,
            options: vec![],
        };
        for i in (1..depth).rev() {
            node = NodeBlueprint {
                content: format!("Step {i}."),
                is_ending: false,
                is_winning_ending: false,
                options: vec![OptionBlueprint {
                    text: "Continue".into(),
                    next_node: Box::new(node),
                }],
            };
        }
        StoryBlueprint {
            title: "Chain".into(),
            root_node: node,
        }
    }

    #[tokio::test]
    async fn test_materialize_persists_full_tree() {
        let repo = InMemoryStoryRepository::new();
        let clock = fixed_clock();
        let session_id = Uuid::new_v4();
        let blueprint = two_branch_blueprint("The Lighthouse");

        let story = materialize(&repo, &clock, session_id, &blueprint)
            .await
            .unwrap();

        assert_eq!(story.title, "The Lighthouse");
        assert_eq!(story.session_id, session_id);
        assert_eq!(story.created_at, clock.0);

        let nodes = repo.load_nodes(story.id).await.unwrap();
        assert_eq!(nodes.len(), 3);

        let roots: Vec<_> = nodes.iter().filter(|n| n.is_root).collect();
        assert_eq!(roots.len(), 1);
        let root = roots[0];
        assert!(!root.is_ending);
        assert_eq!(root.options.len(), 2);
        // Option order is the render order from the blueprint.
        assert_eq!(root.options[0].text, "Climb the stairs");
        assert_eq!(root.options[1].text, "Search the cellar");

        // Each option points at a distinct ending node of the same story.
        let find = |id: Uuid| nodes.iter().find(|n| n.id == id).unwrap();
        let first = find(root.options[0].next_node_id);
        let second = find(root.options[1].next_node_id);
        assert_ne!(first.id, second.id);
        assert!(first.is_ending && first.is_winning_ending);
        assert!(second.is_ending && !second.is_winning_ending);
        assert!(first.options.is_empty() && second.options.is_empty());
    }

    #[tokio::test]
    async fn test_every_non_ending_node_has_matching_children() {
        let repo = InMemoryStoryRepository::new();
        let clock = fixed_clock();
        let blueprint = chain_blueprint(5);

        let story = materialize(&repo, &clock, Uuid::new_v4(), &blueprint)
            .await
            .unwrap();

        let nodes = repo.load_nodes(story.id).await.unwrap();
        assert_eq!(nodes.len(), 5);
        for node in &nodes {
            if node.is_ending {
                assert!(node.options.is_empty());
            } else {
                assert!(!node.options.is_empty());
                for option in &node.options {
                    assert!(nodes.iter().any(|n| n.id == option.next_node_id));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_invalid_blueprint_is_rejected_before_write() {
        let repo = InMemoryStoryRepository::new();
        let clock = fixed_clock();
        let blueprint = StoryBlueprint {
            title: "Broken".into(),
            root_node: NodeBlueprint {
                content: "No way forward.".into(),
                is_ending: false,
                is_winning_ending: false,
                options: vec![],
            },
        };

        let result = materialize(&repo, &clock, Uuid::new_v4(), &blueprint).await;

        assert!(matches!(result, Err(EngineError::Validation(_))));
        assert_eq!(repo.story_count(), 0);
    }

    #[tokio::test]
    async fn test_depth_at_limit_is_accepted() {
        let repo = InMemoryStoryRepository::new();
        let clock = fixed_clock();
        let blueprint = chain_blueprint(MAX_TREE_DEPTH);

        let story = materialize(&repo, &clock, Uuid::new_v4(), &blueprint)
            .await
            .unwrap();

        let nodes = repo.load_nodes(story.id).await.unwrap();
        assert_eq!(nodes.len(), MAX_TREE_DEPTH);
    }

    #[tokio::test]
    async fn test_depth_beyond_limit_commits_nothing() {
        let repo = InMemoryStoryRepository::new();
        let clock = fixed_clock();
        let blueprint = chain_blueprint(MAX_TREE_DEPTH + 1);

        let result = materialize(&repo, &clock, Uuid::new_v4(), &blueprint).await;

        assert!(matches!(
            result,
            Err(EngineError::StructuralLimitExceeded(_))
        ));
        assert_eq!(repo.story_count(), 0);
    }

    #[tokio::test]
    async fn test_node_count_beyond_limit_commits_nothing() {
        // A shallow but wide tree: root with enough ending children to break
        // the node budget without touching the depth guard.
        let repo = InMemoryStoryRepository::new();
        let clock = fixed_clock();
        let options = (0..MAX_TREE_NODES)
            .map(|i| OptionBlueprint {
                text: format!("Choice {i}"),
                next_node: Box::new(NodeBlueprint {
                    content: format!("Ending {i}."),
                    is_ending: true,
                    is_winning_ending: false,
                    options: vec![],
                }),
            })
            .collect();
        let blueprint = StoryBlueprint {
            title: "Wide".into(),
            root_node: NodeBlueprint {
                content: "Too many doors.".into(),
                is_ending: false,
                is_winning_ending: false,
                options,
            },
        };

        let result = materialize(&repo, &clock, Uuid::new_v4(), &blueprint).await;

        assert!(matches!(
            result,
            Err(EngineError::StructuralLimitExceeded(_))
        ));
        assert_eq!(repo.story_count(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let repo = FailingStoryRepository;
        let clock = fixed_clock();
        let blueprint = two_branch_blueprint("Doomed");

        let result = materialize(&repo, &clock, Uuid::new_v4(), &blueprint).await;

        assert!(matches!(result, Err(EngineError::Storage(_))));
    }
}
