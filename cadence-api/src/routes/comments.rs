/// Comment endpoints
///
/// Comments are collaborative: any authenticated user may comment on an
/// existing task, while reading a thread is scoped to the task owner (or
/// an ADMIN) and deletion to the author (or an ADMIN).
///
/// # Endpoints
///
/// ```text
/// POST   /v1/tasks/:id/comments
/// GET    /v1/tasks/:id/comments
/// DELETE /v1/comments/:id
/// ```

use crate::app::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use cadence_store::authz::Caller;
use cadence_store::models::comment::Comment;
use serde::Deserialize;

/// Add comment request
#[derive(Debug, Clone, Deserialize)]
pub struct AddCommentRequest {
    /// Comment text
    pub content: String,
}

/// Adds a comment to a task
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(task_id): Path<String>,
    Json(request): Json<AddCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = state
        .store
        .add_comment(&caller, &task_id, &request.content)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Lists a task's comments as a chronological thread
pub async fn list_comments(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<Vec<Comment>>> {
    let comments = state.store.list_comments(&caller, &task_id).await?;

    Ok(Json(comments))
}

/// Deletes a comment (author or ADMIN only)
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(comment_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete_comment(&caller, &comment_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
