/// Task endpoints
///
/// Create, list, patch and delete recurring tasks, record completions and
/// read completion history. Handlers pass raw input straight to the store,
/// which is the sole validation authority; whatever comes back (validation,
/// not-found and authorization failures included) maps onto HTTP via
/// `ApiError`.
///
/// # Endpoints
///
/// ```text
/// POST   /v1/tasks
/// GET    /v1/tasks?include_completed=&user_id=&order=
/// GET    /v1/tasks/:id
/// PATCH  /v1/tasks/:id
/// DELETE /v1/tasks/:id
/// POST   /v1/tasks/:id/completions
/// GET    /v1/tasks/:id/completions
/// ```
///
/// # Example Request
///
/// ```json
/// { "title": "water the plants", "times_to_complete": 2, "timeframe": "WEEK" }
/// ```

use crate::app::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use cadence_store::authz::Caller;
use cadence_store::models::completion::TaskCompletion;
use cadence_store::models::task::{NewTask, Task, TaskOrder, TaskPatch, Timeframe};
use cadence_store::store::{ListTasksOptions, TaskWithStatus};
use serde::Deserialize;

/// Create task request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title
    pub title: String,

    /// Completions required per cycle (default 1)
    #[serde(default = "default_times_to_complete")]
    pub times_to_complete: i32,

    /// Completion cadence (default DAY)
    #[serde(default = "default_timeframe")]
    pub timeframe: Timeframe,
}

fn default_times_to_complete() -> i32 {
    1
}

fn default_timeframe() -> Timeframe {
    Timeframe::Day
}

/// Task listing query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTasksQuery {
    /// Include tasks whose current cycle is complete
    ///
    /// Omitted: defer to the owner's preference.
    pub include_completed: Option<bool>,

    /// Whose tasks to list (ADMIN only for other users; default: caller)
    pub user_id: Option<String>,

    /// Listing order: `created_at_desc` (default) or `created_at_asc`
    pub order: Option<TaskOrder>,
}

/// Creates a task owned by the caller
pub async fn create_task(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state
        .store
        .create_task(
            &caller,
            NewTask {
                title: request.title,
                times_to_complete: request.times_to_complete,
                timeframe: request.timeframe,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Lists tasks enriched with computed completion status
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<Vec<TaskWithStatus>>> {
    let owner_id = query.user_id.unwrap_or_else(|| caller.user_id.clone());

    let tasks = state
        .store
        .list_tasks_for_user(
            &caller,
            &owner_id,
            ListTasksOptions {
                include_completed: query.include_completed,
                order: query.order.unwrap_or_default(),
            },
        )
        .await?;

    Ok(Json(tasks))
}

/// Fetches one task with its current-cycle status
pub async fn get_task(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<TaskWithStatus>> {
    let task = state.store.get_task(&caller, &task_id).await?;

    Ok(Json(task))
}

/// Task patch request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    pub title: Option<String>,

    /// New per-cycle quota
    pub times_to_complete: Option<i32>,

    /// New cadence
    pub timeframe: Option<Timeframe>,
}

/// Applies a patch to a task
pub async fn update_task(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(task_id): Path<String>,
    Json(request): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = state
        .store
        .update_task(
            &caller,
            &task_id,
            TaskPatch {
                title: request.title,
                times_to_complete: request.times_to_complete,
                timeframe: request.timeframe,
            },
        )
        .await?;

    Ok(Json(task))
}

/// Deletes a task together with its completions and comments
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(task_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete_task(&caller, &task_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Records a completion toward the task's current cycle
pub async fn record_completion(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(task_id): Path<String>,
) -> ApiResult<(StatusCode, Json<TaskCompletion>)> {
    let completion = state.store.record_completion(&caller, &task_id).await?;

    Ok((StatusCode::CREATED, Json(completion)))
}

/// Lists the task's full completion history, oldest first
pub async fn list_completions(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<Vec<TaskCompletion>>> {
    let completions = state.store.list_completions(&caller, &task_id).await?;

    Ok(Json(completions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateTaskRequest =
            serde_json::from_str(r#"{"title": "water the plants"}"#).unwrap();
        assert_eq!(request.times_to_complete, 1);
        assert_eq!(request.timeframe, Timeframe::Day);
    }

    #[test]
    fn test_create_request_rejects_unknown_timeframe() {
        let result = serde_json::from_str::<CreateTaskRequest>(
            r#"{"title": "run", "timeframe": "QUARTER"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_list_query_order_parsing() {
        let query: ListTasksQuery =
            serde_json::from_str(r#"{"order": "created_at_asc"}"#).unwrap();
        assert_eq!(query.order, Some(TaskOrder::CreatedAtAsc));

        let query: ListTasksQuery = serde_json::from_str("{}").unwrap();
        assert!(query.order.is_none());
        assert!(query.include_completed.is_none());
    }
}
