/// TaskCompletion model and database operations
///
/// One row per completion *event*. Repeated completions inside one cycle
/// window each add a unit toward the task's quota; that accumulation is how
/// the quota is satisfied, so inserts are intentionally not idempotent.
///
/// The completer is modeled independently of the task owner to leave room
/// for shared tasks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_completions (
///     id TEXT PRIMARY KEY,
///     task_id TEXT NOT NULL REFERENCES tasks(id),
///     user_id TEXT NOT NULL REFERENCES users(id),
///     timeframe_completion BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::id::new_id;

/// One completion event toward a task's current cycle quota
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskCompletion {
    /// Opaque completion id
    pub id: String,

    /// Task this event counts toward
    pub task_id: String,

    /// User who recorded the completion
    pub user_id: String,

    /// Legacy flag written by callers; completion status is always derived
    /// from timestamps, never read from this column
    pub timeframe_completion: bool,

    /// When the completion was recorded; decides which window it counts in
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

impl TaskCompletion {
    /// Records a completion event stamped now
    pub async fn create(
        pool: &PgPool,
        task_id: &str,
        user_id: &str,
    ) -> Result<Self, sqlx::Error> {
        let completion = sqlx::query_as::<_, TaskCompletion>(
            r#"
            INSERT INTO task_completions (id, task_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, user_id, timeframe_completion,
                      created_at, updated_at
            "#,
        )
        .bind(new_id())
        .bind(task_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(completion)
    }

    /// Lists a task's completion history, oldest first
    ///
    /// Prior-window events stay in the history; which window an event
    /// belongs to is a function of its created_at.
    pub async fn list_by_task(pool: &PgPool, task_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let completions = sqlx::query_as::<_, TaskCompletion>(
            r#"
            SELECT id, task_id, user_id, timeframe_completion,
                   created_at, updated_at
            FROM task_completions
            WHERE task_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(completions)
    }

    /// Counts completions for a task inside `[start, end)`
    ///
    /// This is the current-cycle count when the bounds come from
    /// [`crate::cycle::current_window`].
    pub async fn count_in_window(
        pool: &PgPool,
        task_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM task_completions
            WHERE task_id = $1
              AND created_at >= $2
              AND created_at < $3
            "#,
        )
        .bind(task_id)
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
