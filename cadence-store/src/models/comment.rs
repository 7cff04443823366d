/// Comment model and database operations
///
/// Comments form a chronological thread under a task. Any authenticated
/// user may comment on an existing task; deletion is restricted to the
/// author or an ADMIN (enforced in the store layer).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id TEXT PRIMARY KEY,
///     task_id TEXT NOT NULL REFERENCES tasks(id),
///     user_id TEXT NOT NULL REFERENCES users(id),
///     content TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::id::new_id;

/// Comment on a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    /// Opaque comment id
    pub id: String,

    /// Task the comment belongs to
    pub task_id: String,

    /// Comment author
    pub user_id: String,

    /// Comment text
    pub content: String,

    /// When the comment was written
    pub created_at: DateTime<Utc>,

    /// When the comment was last updated
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Adds a comment to a task
    pub async fn create(
        pool: &PgPool,
        task_id: &str,
        user_id: &str,
        content: &str,
    ) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, task_id, user_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, task_id, user_id, content, created_at, updated_at
            "#,
        )
        .bind(new_id())
        .bind(task_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Finds a comment by id
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, task_id, user_id, content, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    /// Lists a task's comments as a chronological thread (oldest first)
    pub async fn list_by_task(pool: &PgPool, task_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, task_id, user_id, content, created_at, updated_at
            FROM comments
            WHERE task_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Deletes a comment by id
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
