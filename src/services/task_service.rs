//! Task management service

use crate::{
    error::AppError,
    models::employee::Employee,
    models::task::{NewTask, Task, TaskRequest, TaskResponse, TaskStatus, TaskWithAssignee},
    repository::{EmployeeRepository, TaskRepository},
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use validator::Validate;

pub struct TaskService {
    task_repo: Arc<dyn TaskRepository>,
    employee_repo: Arc<dyn EmployeeRepository>,
}

impl TaskService {
    pub fn new(task_repo: Arc<dyn TaskRepository>, employee_repo: Arc<dyn EmployeeRepository>) -> Self {
        Self {
            task_repo,
            employee_repo,
        }
    }

    pub async fn list(&self) -> Result<Vec<TaskResponse>, AppError> {
        let tasks = self.task_repo.list().await?;
        Ok(tasks.into_iter().map(TaskResponse::from).collect())
    }

    /// Tasks assigned to one employee; empty when none (or when the
    /// employee does not exist, matching find-by-association semantics)
    pub async fn list_by_employee(&self, employee_id: i32) -> Result<Vec<TaskResponse>, AppError> {
        let tasks = self.task_repo.list_by_employee(employee_id).await?;
        Ok(tasks.into_iter().map(TaskResponse::from).collect())
    }

    pub async fn create(&self, req: TaskRequest) -> Result<TaskResponse, AppError> {
        req.validate()?;

        let status = parse_status(req.status.as_deref())?.unwrap_or(TaskStatus::Unassigned);
        validate_deadline(req.deadline)?;

        let assignee = self.resolve_assignee(req.assigned_employee_id).await?;

        let task = self
            .task_repo
            .insert(NewTask {
                title: req.title,
                description: req.description,
                status,
                deadline: req.deadline,
                assigned_employee_id: assignee.as_ref().map(|e| e.id),
            })
            .await?;

        tracing::info!(
            task_id = task.id,
            assigned_employee_id = ?task.assigned_employee_id,
            "Task created"
        );

        Ok(respond(task, assignee))
    }

    pub async fn update(&self, id: i32, req: TaskRequest) -> Result<TaskResponse, AppError> {
        let mut task: Task = self
            .task_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))?;

        req.validate()?;

        // Omitted status keeps the current one; unknown values are a 400
        if let Some(status) = parse_status(req.status.as_deref())? {
            task.status = status;
        }
        validate_deadline(req.deadline)?;

        let assignee = self.resolve_assignee(req.assigned_employee_id).await?;

        task.title = req.title;
        task.description = req.description;
        task.deadline = req.deadline;
        task.assigned_employee_id = assignee.as_ref().map(|e| e.id);

        let updated = self.task_repo.update(&task).await?;

        tracing::info!(task_id = updated.id, "Task updated");

        Ok(respond(updated, assignee))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.task_repo.delete(id).await? {
            return Err(AppError::not_found("Task not found"));
        }

        tracing::info!(task_id = id, "Task deleted");
        Ok(())
    }

    /// Look the requested assignee up; `None` means unassigned
    async fn resolve_assignee(&self, employee_id: Option<i32>) -> Result<Option<Employee>, AppError> {
        match employee_id {
            None => Ok(None),
            Some(id) => {
                let employee = self
                    .employee_repo
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Employee not found"))?;
                Ok(Some(employee))
            }
        }
    }
}

fn parse_status(status: Option<&str>) -> Result<Option<TaskStatus>, AppError> {
    match status {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Invalid task status: {}", s))),
    }
}

fn validate_deadline(deadline: Option<NaiveDate>) -> Result<(), AppError> {
    if let Some(deadline) = deadline {
        if deadline < Utc::now().date_naive() {
            return Err(AppError::Validation(
                "Deadline must be today or in the future".to_string(),
            ));
        }
    }
    Ok(())
}

fn respond(task: Task, assignee: Option<Employee>) -> TaskResponse {
    let assigned_employee_name = assignee.map(|e| e.full_name());
    TaskWithAssignee {
        task,
        assigned_employee_name,
    }
    .into()
}
