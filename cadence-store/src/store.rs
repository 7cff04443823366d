/// The Task Tracking Store mutation and query contract
///
/// `TaskStore` is what the presentation layer talks to. Every operation
/// takes an authenticated [`Caller`] and enforces, in this order:
/// validation (the store is the sole validation authority; handlers pass
/// raw input through), existence, then ownership. Errors come back as the
/// four-variant [`StoreError`] taxonomy so each failure stays a distinct
/// user-displayable outcome.
///
/// Mutations that touch more than one row (task deletion and its cascade)
/// run in a single transaction; nothing partial is ever observable.
/// Completion status is computed fresh on every read via [`crate::cycle`].
///
/// # Example
///
/// ```no_run
/// use cadence_store::authz::Caller;
/// use cadence_store::models::task::{NewTask, Timeframe};
/// use cadence_store::models::user::UserRole;
/// use cadence_store::store::TaskStore;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let store = TaskStore::new(pool);
/// let caller = Caller::new("user00000001", UserRole::User);
///
/// let task = store
///     .create_task(
///         &caller,
///         NewTask {
///             title: "water the plants".to_string(),
///             times_to_complete: 2,
///             timeframe: Timeframe::Week,
///         },
///     )
///     .await?;
///
/// store.record_completion(&caller, &task.id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::authz::{require_owner_or_admin, Caller};
use crate::cycle::{current_window, CycleStatus};
use crate::error::{StoreError, StoreResult};
use crate::models::comment::Comment;
use crate::models::completion::TaskCompletion;
use crate::models::profile_picture::ProfilePicture;
use crate::models::task::{NewTask, Task, TaskOrder, TaskPatch};
use crate::models::user::{PreferencesPatch, User};

/// Options for [`TaskStore::list_tasks_for_user`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ListTasksOptions {
    /// Include tasks whose current cycle is already complete
    ///
    /// None defers to the owner's `show_completed_tasks_default` preference.
    pub include_completed: Option<bool>,

    /// Listing order (default newest first)
    pub order: TaskOrder,
}

/// A task enriched with its computed current-cycle status
#[derive(Debug, Clone, Serialize)]
pub struct TaskWithStatus {
    #[serde(flatten)]
    pub task: Task,

    /// Start of the current cycle window (inclusive)
    pub cycle_start: DateTime<Utc>,

    /// End of the current cycle window (exclusive)
    pub cycle_end: DateTime<Utc>,

    /// Completions recorded inside the current window
    pub completions_this_cycle: i64,

    /// Whether the current cycle's quota is met
    pub complete: bool,

    /// Progress fraction, capped at 1.0
    pub progress: f64,
}

impl TaskWithStatus {
    fn new(task: Task, status: CycleStatus) -> Self {
        Self {
            cycle_start: status.window.start,
            cycle_end: status.window.end,
            completions_this_cycle: status.count,
            complete: status.is_complete(),
            progress: status.progress(),
            task,
        }
    }
}

/// The Task Tracking Store
///
/// Cheap to clone; all state lives in the pool.
#[derive(Debug, Clone)]
pub struct TaskStore {
    pool: PgPool,
}

impl TaskStore {
    /// Creates a store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for the auth collaborator's model-level access
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ---- task mutations ----

    /// Creates a task owned by the caller
    ///
    /// # Errors
    ///
    /// `Validation` if the title is empty (after trimming) or the quota is
    /// not positive.
    pub async fn create_task(&self, caller: &Caller, mut data: NewTask) -> StoreResult<Task> {
        data.title = data.title.trim().to_string();
        validate_title(&data.title)?;
        validate_quota(data.times_to_complete)?;

        let task = Task::create(&self.pool, &caller.user_id, data).await?;

        tracing::info!(
            task_id = %task.id,
            user_id = %caller.user_id,
            timeframe = task.timeframe.as_str(),
            times_to_complete = task.times_to_complete,
            "Task created"
        );

        Ok(task)
    }

    /// Applies a patch to a task and bumps its updated_at
    ///
    /// # Errors
    ///
    /// `NotFound` if the task is unknown; `Authorization` unless the caller
    /// owns it or is ADMIN; `Validation` for an empty title or non-positive
    /// quota in the patch.
    pub async fn update_task(
        &self,
        caller: &Caller,
        task_id: &str,
        mut patch: TaskPatch,
    ) -> StoreResult<Task> {
        let task = self.fetch_task(task_id).await?;
        require_owner_or_admin(caller, &task.user_id, "task")?;

        if let Some(ref title) = patch.title {
            let trimmed = title.trim().to_string();
            validate_title(&trimmed)?;
            patch.title = Some(trimmed);
        }
        if let Some(quota) = patch.times_to_complete {
            validate_quota(quota)?;
        }

        let updated = Task::update(&self.pool, task_id, patch)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("task {}", task_id)))?;

        tracing::info!(task_id = %task_id, user_id = %caller.user_id, "Task updated");

        Ok(updated)
    }

    /// Deletes a task and everything hanging off it
    ///
    /// Completions and comments are removed in the same transaction as the
    /// task: all-or-nothing, no orphans observable to concurrent readers.
    pub async fn delete_task(&self, caller: &Caller, task_id: &str) -> StoreResult<()> {
        let task = self.fetch_task(task_id).await?;
        require_owner_or_admin(caller, &task.user_id, "task")?;

        let mut tx = self.pool.begin().await?;

        let completions = sqlx::query("DELETE FROM task_completions WHERE task_id = $1")
            .bind(task_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let comments = sqlx::query("DELETE FROM comments WHERE task_id = $1")
            .bind(task_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            task_id = %task_id,
            user_id = %caller.user_id,
            completions_removed = completions,
            comments_removed = comments,
            "Task deleted with cascade"
        );

        Ok(())
    }

    /// Records a completion event toward the task's current cycle
    ///
    /// Not idempotent by design: each call adds one unit toward the quota.
    /// The task row itself is untouched.
    pub async fn record_completion(
        &self,
        caller: &Caller,
        task_id: &str,
    ) -> StoreResult<TaskCompletion> {
        let task = self.fetch_task(task_id).await?;
        require_owner_or_admin(caller, &task.user_id, "task")?;

        let completion = TaskCompletion::create(&self.pool, task_id, &caller.user_id).await?;

        tracing::info!(
            task_id = %task_id,
            completion_id = %completion.id,
            user_id = %caller.user_id,
            "Completion recorded"
        );

        Ok(completion)
    }

    // ---- comments ----

    /// Adds a comment to a task
    ///
    /// Comments are collaborative: any authenticated caller may comment on
    /// an existing task.
    pub async fn add_comment(
        &self,
        caller: &Caller,
        task_id: &str,
        content: &str,
    ) -> StoreResult<Comment> {
        let content = content.trim();
        validate_content(content)?;

        // Existence only; no ownership restriction here
        self.fetch_task(task_id).await?;

        let comment = Comment::create(&self.pool, task_id, &caller.user_id, content).await?;

        tracing::info!(
            task_id = %task_id,
            comment_id = %comment.id,
            user_id = %caller.user_id,
            "Comment added"
        );

        Ok(comment)
    }

    /// Deletes a comment
    ///
    /// Restricted to the comment's author or an ADMIN.
    pub async fn delete_comment(&self, caller: &Caller, comment_id: &str) -> StoreResult<()> {
        let comment = Comment::find_by_id(&self.pool, comment_id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("comment {}", comment_id)))?;

        require_owner_or_admin(caller, &comment.user_id, "comment")?;

        Comment::delete(&self.pool, comment_id).await?;

        tracing::info!(comment_id = %comment_id, user_id = %caller.user_id, "Comment deleted");

        Ok(())
    }

    // ---- user preferences / profile ----

    /// Applies a preferences patch to the caller's own account
    ///
    /// The patch type is closed: only name, image, themes and the
    /// completed-tasks default are reachable; role and email are not.
    pub async fn update_user_preferences(
        &self,
        caller: &Caller,
        mut patch: PreferencesPatch,
    ) -> StoreResult<User> {
        if let Some(ref name) = patch.name {
            let trimmed = name.trim().to_string();
            if trimmed.is_empty() {
                return Err(StoreError::validation("name must not be empty"));
            }
            patch.name = Some(trimmed);
        }

        let user = User::update_preferences(&self.pool, &caller.user_id, patch)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("user {}", caller.user_id)))?;

        tracing::info!(user_id = %caller.user_id, "Preferences updated");

        Ok(user)
    }

    /// Records an uploaded avatar and points the user's image at it
    ///
    /// Both writes happen in one transaction so the current avatar never
    /// references a picture that failed to persist.
    pub async fn add_profile_picture(
        &self,
        caller: &Caller,
        url: &str,
    ) -> StoreResult<ProfilePicture> {
        let url = url.trim();
        if url.is_empty() {
            return Err(StoreError::validation("url must not be empty"));
        }

        let mut tx = self.pool.begin().await?;

        let picture = sqlx::query_as::<_, ProfilePicture>(
            r#"
            INSERT INTO profile_pictures (id, user_id, url)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, url, created_at
            "#,
        )
        .bind(crate::id::new_id())
        .bind(&caller.user_id)
        .bind(url)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET image = $2, updated_at = NOW() WHERE id = $1")
            .bind(&caller.user_id)
            .bind(url)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(user_id = %caller.user_id, picture_id = %picture.id, "Avatar uploaded");

        Ok(picture)
    }

    /// Lists a user's uploaded avatars (own, or any for ADMIN)
    pub async fn list_profile_pictures(
        &self,
        caller: &Caller,
        user_id: &str,
    ) -> StoreResult<Vec<ProfilePicture>> {
        require_owner_or_admin(caller, user_id, "profile pictures")?;

        Ok(ProfilePicture::list_by_user(&self.pool, user_id).await?)
    }

    /// Fetches the caller's own user row
    pub async fn current_user(&self, caller: &Caller) -> StoreResult<User> {
        User::find_by_id(&self.pool, &caller.user_id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("user {}", caller.user_id)))
    }

    // ---- queries ----

    /// Fetches one task with its computed current-cycle status
    pub async fn get_task(&self, caller: &Caller, task_id: &str) -> StoreResult<TaskWithStatus> {
        let task = self.fetch_task(task_id).await?;
        require_owner_or_admin(caller, &task.user_id, "task")?;

        self.with_status(task, Utc::now()).await
    }

    /// Lists a user's tasks enriched with completion status
    ///
    /// Non-ADMIN callers may only list their own tasks. When the
    /// include-completed filter resolves to false, tasks whose current cycle
    /// is already complete are dropped from the result.
    pub async fn list_tasks_for_user(
        &self,
        caller: &Caller,
        owner_id: &str,
        opts: ListTasksOptions,
    ) -> StoreResult<Vec<TaskWithStatus>> {
        require_owner_or_admin(caller, owner_id, "tasks")?;

        let include_completed = match opts.include_completed {
            Some(flag) => flag,
            None => {
                let owner = User::find_by_id(&self.pool, owner_id)
                    .await?
                    .ok_or_else(|| StoreError::not_found(format!("user {}", owner_id)))?;
                owner.show_completed_tasks_default
            }
        };

        let now = Utc::now();
        let tasks = Task::list_by_user(&self.pool, owner_id, opts.order).await?;

        let mut result = Vec::with_capacity(tasks.len());
        for task in tasks {
            let enriched = self.with_status(task, now).await?;
            if include_completed || !enriched.complete {
                result.push(enriched);
            }
        }

        Ok(result)
    }

    /// Lists a task's comments as a chronological thread
    ///
    /// Scoped to the caller's own tasks unless ADMIN.
    pub async fn list_comments(&self, caller: &Caller, task_id: &str) -> StoreResult<Vec<Comment>> {
        let task = self.fetch_task(task_id).await?;
        require_owner_or_admin(caller, &task.user_id, "task")?;

        Ok(Comment::list_by_task(&self.pool, task_id).await?)
    }

    /// Lists a task's full completion history, oldest first
    ///
    /// Events from prior windows remain attributed to those windows; the
    /// history is never rewritten when a new cycle starts.
    pub async fn list_completions(
        &self,
        caller: &Caller,
        task_id: &str,
    ) -> StoreResult<Vec<TaskCompletion>> {
        let task = self.fetch_task(task_id).await?;
        require_owner_or_admin(caller, &task.user_id, "task")?;

        Ok(TaskCompletion::list_by_task(&self.pool, task_id).await?)
    }

    // ---- internals ----

    async fn fetch_task(&self, task_id: &str) -> StoreResult<Task> {
        Task::find_by_id(&self.pool, task_id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("task {}", task_id)))
    }

    /// Computes the task's status fresh against the database
    async fn with_status(&self, task: Task, now: DateTime<Utc>) -> StoreResult<TaskWithStatus> {
        let window = current_window(task.created_at, task.timeframe, now);
        let count =
            TaskCompletion::count_in_window(&self.pool, &task.id, window.start, window.end).await?;

        let status = CycleStatus::new(window, count, task.times_to_complete);
        Ok(TaskWithStatus::new(task, status))
    }
}

fn validate_title(title: &str) -> StoreResult<()> {
    if title.is_empty() {
        return Err(StoreError::validation("title must not be empty"));
    }
    if title.len() > 255 {
        return Err(StoreError::validation("title must be at most 255 characters"));
    }
    Ok(())
}

fn validate_quota(times_to_complete: i32) -> StoreResult<()> {
    if times_to_complete < 1 {
        return Err(StoreError::validation(
            "times_to_complete must be at least 1",
        ));
    }
    Ok(())
}

fn validate_content(content: &str) -> StoreResult<()> {
    if content.is_empty() {
        return Err(StoreError::validation("content must not be empty"));
    }
    Ok(())
}
