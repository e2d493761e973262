//! Authentication HTTP handlers

use crate::{error::AppError, middleware::AppState, models::auth::LoginRequest};
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

/// Log in and receive a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.login(req).await?;
    Ok(Json(response))
}
