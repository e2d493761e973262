//! Employee management HTTP handlers (admin only, enforced in routing)

use crate::{
    error::AppError,
    middleware::AppState,
    models::employee::{EmployeeRequest, PasswordUpdateRequest},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// List all employees with task counts
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let employees = state.employee_service.list().await?;
    Ok(Json(employees))
}

/// Create an employee
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EmployeeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let employee = state.employee_service.create(req).await?;
    Ok(Json(employee))
}

/// Update an employee
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<EmployeeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let employee = state.employee_service.update(id, req).await?;
    Ok(Json(employee))
}

/// Replace an employee's password
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<PasswordUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .employee_service
        .update_password(id, &req.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an employee
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    state.employee_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
