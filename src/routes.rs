//! Route registration
//! Builds the router: public endpoints, the login route, and the
//! role-guarded API groups, with the authentication middleware and CORS
//! applied outside all of them

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

use crate::{
    auth::middleware::{authenticate, require_admin, require_authenticated, AuthContext},
    config::CorsConfig,
    error::AppError,
    handlers,
    middleware::AppState,
};

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // Always permitted, no identity required
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api-docs", get(handlers::docs::api_docs))
        .route("/api-docs/openapi.json", get(handlers::docs::api_docs));

    let auth_routes = Router::new().route("/auth/login", post(handlers::auth::login));

    // Employee management requires an admin identity
    let employee_routes = Router::new()
        .route(
            "/api/employees",
            get(handlers::employee::list_employees).post(handlers::employee::create_employee),
        )
        .route(
            "/api/employees/{id}",
            put(handlers::employee::update_employee).delete(handlers::employee::delete_employee),
        )
        .route(
            "/api/employees/{id}/password",
            put(handlers::employee::update_password),
        )
        .layer(axum::middleware::from_fn(require_admin));

    // Tasks require any authenticated identity
    let task_routes = Router::new()
        .route(
            "/api/tasks",
            get(handlers::task::list_tasks).post(handlers::task::create_task),
        )
        .route(
            "/api/tasks/user/{employee_id}",
            get(handlers::task::list_tasks_by_employee),
        )
        .route(
            "/api/tasks/{id}",
            put(handlers::task::update_task).delete(handlers::task::delete_task),
        )
        .layer(axum::middleware::from_fn(require_authenticated));

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(employee_routes)
        .merge(task_routes)
        // Anything unmatched still requires an identity
        .fallback(default_deny)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            authenticate,
        ))
        .layer(build_cors_layer(&state.config.cors))
        .layer(axum::middleware::from_fn(
            crate::middleware::request_tracking_middleware,
        ))
        .with_state(state)
}

/// Default rule: unmatched paths are 404 for authenticated callers and 401
/// for anonymous ones, evaluated after every explicit route group
async fn default_deny(req: Request) -> AppError {
    if req.extensions().get::<AuthContext>().is_some() {
        AppError::not_found("Resource not found")
    } else {
        AppError::Unauthorized
    }
}

/// Build the CORS layer from config. Invalid entries are skipped with a
/// warning rather than failing startup.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|method| match method.parse::<Method>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%method, "Ignoring unparseable CORS method");
                None
            }
        })
        .collect();

    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|name| match name.parse::<HeaderName>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(header = %name, "Ignoring unparseable CORS header");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(true)
        .expose_headers([header::AUTHORIZATION])
        .max_age(Duration::from_secs(config.max_age_secs))
}
