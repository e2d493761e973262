//! Employee domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Employee record as stored in the credential store.
///
/// Deliberately not `Serialize`: `password_hash` must never cross the HTTP
/// boundary, so all outward traffic goes through [`EmployeeResponse`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Employee {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,

    /// Free-text job title, display only. Authorization is driven solely
    /// by the `admin` flag via [`Employee::access_role`].
    pub role: String,
    pub admin: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Authorization role, derived once from the stored admin flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Standard,
}

impl Employee {
    pub fn access_role(&self) -> Role {
        if self.admin {
            Role::Admin
        } else {
            Role::Standard
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Field set for inserting a new employee
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub admin: bool,
}

/// Create/update request body. Updates are full replacements of the
/// directory fields; the password is only touched when one is supplied.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    #[validate(length(min = 1, max = 50, message = "First name must not be blank"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must not be blank"))]
    pub last_name: String,

    #[validate(email(message = "Email must be valid"))]
    pub email: String,

    #[validate(length(min = 1, message = "Username must not be blank"))]
    pub username: String,

    #[validate(length(min = 1, message = "Role must not be blank"))]
    pub role: String,

    #[serde(default)]
    pub admin: bool,

    /// Required on create, optional on update
    pub password: Option<String>,
}

/// Password replacement request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateRequest {
    pub password: String,
}

/// Employee response DTO (no credential material)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub admin: bool,
    pub task_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployeeResponse {
    pub fn from_employee(employee: Employee, task_count: i64) -> Self {
        Self {
            id: employee.id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            username: employee.username,
            role: employee.role,
            admin: employee.admin,
            task_count,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}
