/// Task model and database operations
///
/// A task is a recurring chore: "water the plants, twice a week". The
/// cadence is a `Timeframe` plus a quota (`times_to_complete`); whether the
/// current cycle is satisfied is never stored on the row, it is derived by
/// [`crate::cycle`] from the completion timestamps on every read.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_timeframe AS ENUM ('DAY', 'WEEK', 'FORTNIGHT', 'MONTH');
///
/// CREATE TABLE tasks (
///     id TEXT PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     user_id TEXT NOT NULL REFERENCES users(id),
///     times_to_complete INTEGER NOT NULL DEFAULT 1
///         CHECK (times_to_complete >= 1),
///     timeframe task_timeframe NOT NULL DEFAULT 'DAY',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::id::new_id;

/// Completion cadence of a task
///
/// Fixed-length windows: a MONTH is always 30 days so windows tile time
/// from the task's creation with no gaps or overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_timeframe", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Timeframe {
    /// One day per cycle
    Day,

    /// Seven days per cycle
    Week,

    /// Fourteen days per cycle
    Fortnight,

    /// Thirty days per cycle
    Month,
}

impl Timeframe {
    /// Converts timeframe to string for display and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Day => "DAY",
            Timeframe::Week => "WEEK",
            Timeframe::Fortnight => "FORTNIGHT",
            Timeframe::Month => "MONTH",
        }
    }

    /// Length of one cycle window
    pub fn duration(&self) -> Duration {
        match self {
            Timeframe::Day => Duration::days(1),
            Timeframe::Week => Duration::days(7),
            Timeframe::Fortnight => Duration::days(14),
            Timeframe::Month => Duration::days(30),
        }
    }
}

/// Ordering for task listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOrder {
    /// Newest first (default)
    #[default]
    CreatedAtDesc,

    /// Oldest first
    CreatedAtAsc,
}

impl TaskOrder {
    fn sql(&self) -> &'static str {
        match self {
            TaskOrder::CreatedAtDesc => "DESC",
            TaskOrder::CreatedAtAsc => "ASC",
        }
    }
}

/// Task model representing a recurring task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Opaque task id
    pub id: String,

    /// Task title
    pub title: String,

    /// Owning user
    pub user_id: String,

    /// Completions required per cycle window (>= 1)
    pub times_to_complete: i32,

    /// Length of one cycle window
    pub timeframe: Timeframe,

    /// When the task was created; anchors the cycle windows
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    /// Task title
    pub title: String,

    /// Completions required per cycle (>= 1)
    pub times_to_complete: i32,

    /// Completion cadence
    pub timeframe: Timeframe,
}

/// Input for updating a task
///
/// Only non-None fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New title
    pub title: Option<String>,

    /// New per-cycle quota
    pub times_to_complete: Option<i32>,

    /// New cadence
    ///
    /// Cycle windows stay anchored to created_at; changing the cadence
    /// re-tiles them from there.
    pub timeframe: Option<Timeframe>,
}

impl TaskPatch {
    /// Checks whether the patch changes anything
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.times_to_complete.is_none() && self.timeframe.is_none()
    }
}

impl Task {
    /// Creates a new task owned by `user_id`
    ///
    /// Validation (non-empty title, quota >= 1) happens in the store layer;
    /// the schema CHECK is the last line of defense.
    pub async fn create(
        pool: &PgPool,
        user_id: &str,
        data: NewTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (id, title, user_id, times_to_complete, timeframe)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, user_id, times_to_complete, timeframe,
                      created_at, updated_at
            "#,
        )
        .bind(new_id())
        .bind(data.title)
        .bind(user_id)
        .bind(data.times_to_complete)
        .bind(data.timeframe)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by id
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, user_id, times_to_complete, timeframe,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Applies a patch and bumps updated_at
    ///
    /// Returns the updated task, or None if it does not exist.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        patch: TaskPatch,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if patch.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if patch.times_to_complete.is_some() {
            bind_count += 1;
            query.push_str(&format!(", times_to_complete = ${}", bind_count));
        }
        if patch.timeframe.is_some() {
            bind_count += 1;
            query.push_str(&format!(", timeframe = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, user_id, times_to_complete, \
             timeframe, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = patch.title {
            q = q.bind(title);
        }
        if let Some(quota) = patch.times_to_complete {
            q = q.bind(quota);
        }
        if let Some(timeframe) = patch.timeframe {
            q = q.bind(timeframe);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Lists a user's tasks ordered by creation time
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: &str,
        order: TaskOrder,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT id, title, user_id, times_to_complete, timeframe, \
             created_at, updated_at \
             FROM tasks WHERE user_id = $1 ORDER BY created_at {}",
            order.sql()
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Counts tasks owned by a user
    pub async fn count_by_user(pool: &PgPool, user_id: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
