//! Task management HTTP handlers (any authenticated user)

use crate::{error::AppError, middleware::AppState, models::task::TaskRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// List all tasks
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let tasks = state.task_service.list().await?;
    Ok(Json(tasks))
}

/// List the tasks assigned to one employee
pub async fn list_tasks_by_employee(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let tasks = state.task_service.list_by_employee(employee_id).await?;
    Ok(Json(tasks))
}

/// Create a task
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let task = state.task_service.create(req).await?;
    Ok(Json(task))
}

/// Update a task
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<TaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let task = state.task_service.update(id, req).await?;
    Ok(Json(task))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    state.task_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
