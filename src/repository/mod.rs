//! Persistence layer
//!
//! The service and auth layers talk to the stores through these traits;
//! the Postgres implementations live in the sibling modules and the
//! integration tests substitute an in-memory store.

pub mod employee_repo;
pub mod task_repo;

pub use employee_repo::PgEmployeeRepository;
pub use task_repo::PgTaskRepository;

use crate::error::AppError;
use crate::models::employee::{Employee, NewEmployee};
use crate::models::task::{NewTask, Task, TaskWithAssignee};
use async_trait::async_trait;

/// Credential store and employee directory
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Cheap reachability probe for readiness checks
    async fn ping(&self) -> Result<(), AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Employee>, AppError>;

    /// All employees, each with the number of tasks assigned to them
    async fn list_with_task_count(&self) -> Result<Vec<(Employee, i64)>, AppError>;

    async fn insert(&self, employee: NewEmployee) -> Result<Employee, AppError>;

    /// Full-row update keyed on `employee.id`
    async fn update(&self, employee: &Employee) -> Result<Employee, AppError>;

    /// Returns false when no such employee exists
    async fn update_password(&self, id: i32, password_hash: &str) -> Result<bool, AppError>;

    /// Returns false when no such employee exists
    async fn delete(&self, id: i32) -> Result<bool, AppError>;

    async fn exists(&self, id: i32) -> Result<bool, AppError>;
}

/// Task store
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, AppError>;

    async fn find_with_assignee(&self, id: i32) -> Result<Option<TaskWithAssignee>, AppError>;

    async fn list(&self) -> Result<Vec<TaskWithAssignee>, AppError>;

    async fn list_by_employee(&self, employee_id: i32) -> Result<Vec<TaskWithAssignee>, AppError>;

    async fn insert(&self, task: NewTask) -> Result<Task, AppError>;

    /// Full-row update keyed on `task.id`
    async fn update(&self, task: &Task) -> Result<Task, AppError>;

    /// Returns false when no such task exists
    async fn delete(&self, id: i32) -> Result<bool, AppError>;

    async fn exists(&self, id: i32) -> Result<bool, AppError>;
}
