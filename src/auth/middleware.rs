//! Request authentication middleware and authorization policy layers
//!
//! `authenticate` runs on every request: it turns a valid bearer token into
//! a request-scoped [`AuthContext`]. The `require_*` layers below it enforce
//! the per-route policy before any handler executes.

use crate::{
    auth::jwt::TokenError,
    error::AppError,
    middleware::AppState,
    models::employee::Role,
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Identity context established for the request (attached to extensions).
/// Absent means the request is anonymous.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub employee_id: i32,
    pub username: String,
    pub role: Role,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Extract the bearer token from the Authorization header.
/// `None` when the header is absent or not `Bearer `-prefixed; the literal
/// prefix is matched case- and space-sensitively. The returned slice may be
/// empty ("Bearer " with nothing after it).
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Authentication middleware, applied to every route.
///
/// Requests without a bearer token pass through anonymous; the policy
/// layers decide whether that is acceptable. Requests with a token are
/// rejected here when the token is empty, expired or invalid. On a valid
/// token the subject is re-resolved from the credential store so role
/// changes and deletions take effect immediately; a vanished subject is
/// treated as anonymous.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = match extract_token(req.headers()) {
        None => return Ok(next.run(req).await),
        Some(token) => token.to_string(),
    };

    if token.trim().is_empty() {
        return Err(AppError::BadRequest("Token is missing".to_string()));
    }

    let claims = match state.jwt_service.parse(&token) {
        Ok(claims) => claims,
        Err(TokenError::Expired) => {
            return Err(AppError::authentication("Token has expired"));
        }
        Err(TokenError::Invalid) | Err(TokenError::Malformed) => {
            return Err(AppError::authentication("Invalid token"));
        }
    };

    // Re-resolve the subject: the store, not the token, is the source of
    // truth for the current role.
    let deadline = Duration::from_secs(state.config.security.credential_lookup_timeout_secs);
    let employee = match timeout(deadline, state.employee_repo.find_by_username(&claims.sub)).await
    {
        Ok(Ok(employee)) => employee,
        Ok(Err(e)) => return Err(e),
        Err(_) => {
            tracing::warn!(username = %claims.sub, "Credential lookup exceeded deadline");
            return Err(AppError::internal_error("Credential lookup timed out"));
        }
    };

    match employee {
        Some(employee) => {
            // Only one identity context per request; never overwrite one
            // that is already set.
            if req.extensions().get::<AuthContext>().is_none() {
                req.extensions_mut().insert(AuthContext {
                    employee_id: employee.id,
                    username: employee.username.clone(),
                    role: employee.access_role(),
                });
            }
        }
        None => {
            // Subject was deleted after the token was issued: fail closed
            // by leaving the request anonymous.
            tracing::warn!(username = %claims.sub, "Token subject no longer exists");
        }
    }

    Ok(next.run(req).await)
}

/// Policy layer: any authenticated identity may pass
pub async fn require_authenticated(req: Request, next: Next) -> Result<Response, AppError> {
    if req.extensions().get::<AuthContext>().is_none() {
        return Err(AppError::Unauthorized);
    }
    Ok(next.run(req).await)
}

/// Policy layer: only admins may pass
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    match req.extensions().get::<AuthContext>() {
        None => Err(AppError::Unauthorized),
        Some(ctx) if !ctx.is_admin() => Err(AppError::Forbidden),
        Some(_) => Ok(next.run(req).await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_valid() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer test_token_123".parse().unwrap());

        assert_eq!(extract_token(&headers), Some("test_token_123"));
    }

    #[test]
    fn test_extract_token_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn test_extract_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());

        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn test_extract_token_prefix_is_case_sensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "bearer test_token".parse().unwrap());

        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn test_extract_token_empty_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());

        // Present but empty: the middleware turns this into 400
        assert_eq!(extract_token(&headers), Some(""));
    }
}
