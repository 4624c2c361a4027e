//! Story engine database schema.

/// SQL to create the jobs table.
pub const CREATE_JOBS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS story_jobs (
    job_id       UUID PRIMARY KEY,
    session_id   UUID NOT NULL,
    theme        TEXT NOT NULL,
    status       VARCHAR(16) NOT NULL,
    story_id     UUID,
    error        TEXT,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    completed_at TIMESTAMPTZ
);

CREATE INDEX IF NOT EXISTS idx_story_jobs_session_id
    ON story_jobs (session_id);
";

/// SQL to create the stories and story_nodes tables. Options are stored as a
/// JSONB array on their owning node, preserving render order.
pub const CREATE_STORIES_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS stories (
    id         UUID PRIMARY KEY,
    title      TEXT NOT NULL,
    session_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS story_nodes (
    id                UUID PRIMARY KEY,
    story_id          UUID NOT NULL REFERENCES stories (id),
    content           TEXT NOT NULL,
    is_root           BOOLEAN NOT NULL DEFAULT FALSE,
    is_ending         BOOLEAN NOT NULL DEFAULT FALSE,
    is_winning_ending BOOLEAN NOT NULL DEFAULT FALSE,
    options           JSONB NOT NULL DEFAULT '[]'
);

CREATE INDEX IF NOT EXISTS idx_story_nodes_story_id
    ON story_nodes (story_id);
";

/// Applies the full schema.
///
/// # Errors
///
/// Returns the underlying `sqlx::Error` if any statement fails.
pub async fn apply(pool: &sqlx::PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(CREATE_JOBS_TABLE).execute(pool).await?;
    sqlx::raw_sql(CREATE_STORIES_TABLES).execute(pool).await?;
    Ok(())
}
