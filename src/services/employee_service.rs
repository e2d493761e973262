//! Employee management service

use crate::{
    auth::password::PasswordHasher,
    config::AppConfig,
    error::AppError,
    models::employee::{Employee, EmployeeRequest, EmployeeResponse, NewEmployee},
    repository::{EmployeeRepository, TaskRepository},
};
use std::sync::Arc;
use validator::Validate;

pub struct EmployeeService {
    employee_repo: Arc<dyn EmployeeRepository>,
    task_repo: Arc<dyn TaskRepository>,
    password_hasher: Arc<PasswordHasher>,
    config: Arc<AppConfig>,
}

impl EmployeeService {
    pub fn new(
        employee_repo: Arc<dyn EmployeeRepository>,
        task_repo: Arc<dyn TaskRepository>,
        password_hasher: Arc<PasswordHasher>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            employee_repo,
            task_repo,
            password_hasher,
            config,
        }
    }

    /// All employees with their assigned-task counts
    pub async fn list(&self) -> Result<Vec<EmployeeResponse>, AppError> {
        let employees = self.employee_repo.list_with_task_count().await?;

        Ok(employees
            .into_iter()
            .map(|(employee, task_count)| EmployeeResponse::from_employee(employee, task_count))
            .collect())
    }

    /// Create an employee. A password is mandatory here: a credential
    /// without a hash could never log in.
    pub async fn create(&self, req: EmployeeRequest) -> Result<EmployeeResponse, AppError> {
        req.validate()?;

        let password = match req.password.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => {
                return Err(AppError::Validation(
                    "Password is required when creating an employee".to_string(),
                ))
            }
        };
        PasswordHasher::validate_password_policy(password, &self.config.security)?;
        let password_hash = self.password_hasher.hash(password)?;

        let employee = self
            .employee_repo
            .insert(NewEmployee {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                username: req.username,
                password_hash,
                role: req.role,
                admin: req.admin,
            })
            .await?;

        tracing::info!(
            employee_id = employee.id,
            username = %employee.username,
            admin = employee.admin,
            "Employee created"
        );

        Ok(EmployeeResponse::from_employee(employee, 0))
    }

    /// Full update of the directory fields; the password is re-hashed only
    /// when one is provided.
    pub async fn update(&self, id: i32, req: EmployeeRequest) -> Result<EmployeeResponse, AppError> {
        req.validate()?;

        let mut employee: Employee = self
            .employee_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee not found"))?;

        employee.first_name = req.first_name;
        employee.last_name = req.last_name;
        employee.email = req.email;
        employee.username = req.username;
        employee.role = req.role;
        employee.admin = req.admin;

        if let Some(password) = req.password.as_deref().filter(|p| !p.is_empty()) {
            PasswordHasher::validate_password_policy(password, &self.config.security)?;
            employee.password_hash = self.password_hasher.hash(password)?;
        }

        let updated = self.employee_repo.update(&employee).await?;
        let task_count = self.task_repo.list_by_employee(updated.id).await?.len() as i64;

        tracing::info!(employee_id = updated.id, "Employee updated");

        Ok(EmployeeResponse::from_employee(updated, task_count))
    }

    /// Replace an employee's password
    pub async fn update_password(&self, id: i32, password: &str) -> Result<(), AppError> {
        PasswordHasher::validate_password_policy(password, &self.config.security)?;

        let password_hash = self.password_hasher.hash(password)?;

        if !self.employee_repo.update_password(id, &password_hash).await? {
            return Err(AppError::not_found("Employee not found"));
        }

        tracing::info!(employee_id = id, "Employee password updated");
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.employee_repo.delete(id).await? {
            return Err(AppError::not_found("Employee not found"));
        }

        tracing::info!(employee_id = id, "Employee deleted");
        Ok(())
    }
}
