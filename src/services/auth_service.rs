//! Authentication service: credential verification and token issuance

use crate::{
    auth::jwt::JwtService,
    auth::password::PasswordHasher,
    config::AppConfig,
    error::AppError,
    models::auth::{LoginRequest, LoginResponse},
    repository::EmployeeRepository,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

pub struct AuthService {
    employee_repo: Arc<dyn EmployeeRepository>,
    jwt_service: Arc<JwtService>,
    password_hasher: Arc<PasswordHasher>,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(
        employee_repo: Arc<dyn EmployeeRepository>,
        jwt_service: Arc<JwtService>,
        password_hasher: Arc<PasswordHasher>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            employee_repo,
            jwt_service,
            password_hasher,
            config,
        }
    }

    /// Log a user in: validate the request, look the credential up, verify
    /// the password and issue a token. Stateless; nothing is persisted.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        // Reject incomplete requests before consulting the store
        let username = req.username.as_deref().map(str::trim).unwrap_or("");
        let password = req.password.as_deref().unwrap_or("");

        if username.is_empty() || password.is_empty() {
            return Err(AppError::BadRequest(
                "Invalid request. Username and password are required.".to_string(),
            ));
        }

        let deadline = Duration::from_secs(self.config.security.credential_lookup_timeout_secs);
        let employee = match timeout(deadline, self.employee_repo.find_by_username(username)).await
        {
            Ok(found) => found?,
            Err(_) => {
                tracing::warn!(%username, "Credential lookup exceeded deadline");
                return Err(AppError::internal_error("Credential lookup timed out"));
            }
        };

        let Some(employee) = employee else {
            tracing::debug!(%username, "Login attempt for unknown username");
            return Err(AppError::not_found(
                "User not found. Please check your username.",
            ));
        };

        if !self
            .password_hasher
            .verify(password, &employee.password_hash)?
        {
            tracing::warn!(%username, "Login attempt with wrong password");
            return Err(AppError::authentication("Incorrect username or password."));
        }

        let token = self
            .jwt_service
            .issue(employee.id, &employee.username, employee.admin)?;

        tracing::info!(
            employee_id = employee.id,
            username = %employee.username,
            "Login successful"
        );

        Ok(LoginResponse {
            token,
            username: employee.username,
            admin: employee.admin,
            employee_id: employee.id,
        })
    }
}
