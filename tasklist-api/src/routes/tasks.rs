/// Task endpoints
///
/// Every handler runs behind the JWT layer and passes the caller's id to
/// [`TaskService`](tasklist_shared::services::task_service::TaskService), so
/// another user's task answers 404 exactly like a missing one.
///
/// - `GET    /api/tasks?status=completed|pending`
/// - `POST   /api/tasks`
/// - `GET    /api/tasks/:id`
/// - `PUT    /api/tasks/:id`
/// - `DELETE /api/tasks/:id`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tasklist_shared::{
    auth::middleware::AuthUser,
    models::task::{StatusFilter, Task, TaskChanges},
    services::task_service::NewTask,
};

/// Query parameters for listing
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// `completed` or `pending`; anything else is rejected with 422
    pub status: Option<String>,
}

impl ListQuery {
    fn filter(&self) -> ApiResult<Option<StatusFilter>> {
        self.status
            .as_deref()
            .map(str::parse::<StatusFilter>)
            .transpose()
            .map_err(|e| ApiError::invalid_field("status", e.to_string()))
    }
}

/// Lists the caller's tasks, newest first
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let filter = query.filter()?;
    let tasks = state.tasks.list(auth.user_id, filter).await?;
    Ok(Json(tasks))
}

/// Creates a task owned by the caller
///
/// ```text
/// POST /api/tasks
///
/// { "title": "Buy milk", "priority": "high" }
/// ```
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(new_task): Json<NewTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state.tasks.create(auth.user_id, new_task).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.get(id, auth.user_id).await?;
    Ok(Json(task))
}

/// Applies a partial update
///
/// Fields left out of the body, or sent as `null`, keep their value.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(changes): Json<TaskChanges>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.update(id, auth.user_id, changes).await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.tasks.delete(id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
