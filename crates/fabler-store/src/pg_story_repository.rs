//! PostgreSQL implementation of the `StoryRepository` trait.
//!
//! The tree write runs in a single transaction: either the story row and
//! every node row commit together or nothing does, which is the
//! materializer's all-or-nothing contract.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use fabler_core::error::EngineError;
use fabler_core::repository::StoryRepository;
use fabler_core::story::{Story, StoryNode, StoryOption};

/// PostgreSQL-backed story repository.
#[derive(Debug, Clone)]
pub struct PgStoryRepository {
    pool: PgPool,
}

impl PgStoryRepository {
    /// Creates a new `PgStoryRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage_err(e: sqlx::Error) -> EngineError {
    EngineError::Storage(e.to_string())
}

fn story_from_row(row: &PgRow) -> Result<Story, EngineError> {
    Ok(Story {
        id: row.try_get("id").map_err(storage_err)?,
        title: row.try_get("title").map_err(storage_err)?,
        session_id: row.try_get("session_id").map_err(storage_err)?,
        created_at: row.try_get("created_at").map_err(storage_err)?,
    })
}

fn node_from_row(row: &PgRow) -> Result<StoryNode, EngineError> {
    let options: sqlx::types::Json<Vec<StoryOption>> =
        row.try_get("options").map_err(storage_err)?;
    Ok(StoryNode {
        id: row.try_get("id").map_err(storage_err)?,
        story_id: row.try_get("story_id").map_err(storage_err)?,
        content: row.try_get("content").map_err(storage_err)?,
        is_root: row.try_get("is_root").map_err(storage_err)?,
        is_ending: row.try_get("is_ending").map_err(storage_err)?,
        is_winning_ending: row.try_get("is_winning_ending").map_err(storage_err)?,
        options: options.0,
    })
}

#[async_trait]
impl StoryRepository for PgStoryRepository {
    #[instrument(skip(self, story, nodes), fields(story_id = %story.id, nodes = nodes.len()))]
    async fn insert_story_tree(
        &self,
        story: &Story,
        nodes: &[StoryNode],
    ) -> Result<(), EngineError> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        sqlx::query("INSERT INTO stories (id, title, session_id, created_at) VALUES ($1, $2, $3, $4)")
            .bind(story.id)
            .bind(&story.title)
            .bind(story.session_id)
            .bind(story.created_at)
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;

        for node in nodes {
            sqlx::query(
                "INSERT INTO story_nodes
                     (id, story_id, content, is_root, is_ending, is_winning_ending, options)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(node.id)
            .bind(node.story_id)
            .bind(&node.content)
            .bind(node.is_root)
            .bind(node.is_ending)
            .bind(node.is_winning_ending)
            .bind(sqlx::types::Json(&node.options))
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;
        }

        tx.commit().await.map_err(storage_err)
    }

    async fn find_story(&self, story_id: Uuid) -> Result<Option<Story>, EngineError> {
        let row = sqlx::query("SELECT id, title, session_id, created_at FROM stories WHERE id = $1")
            .bind(story_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        row.as_ref().map(story_from_row).transpose()
    }

    async fn load_nodes(&self, story_id: Uuid) -> Result<Vec<StoryNode>, EngineError> {
        let rows = sqlx::query(
            "SELECT id, story_id, content, is_root, is_ending, is_winning_ending, options
             FROM story_nodes
             WHERE story_id = $1",
        )
        .bind(story_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter().map(node_from_row).collect()
    }
}
