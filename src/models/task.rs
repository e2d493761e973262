//! Task domain models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Task lifecycle state. Wire and storage format is the upper-case
/// snake form ("IN_PROGRESS").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Unassigned,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Unassigned => "UNASSIGNED",
        }
    }

    /// Lenient conversion for values read back from storage
    pub fn from_stored(s: &str) -> Self {
        s.parse().unwrap_or(TaskStatus::Unassigned)
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(TaskStatus::Pending),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETED" => Ok(TaskStatus::Completed),
            "UNASSIGNED" => Ok(TaskStatus::Unassigned),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task record
#[derive(Debug, Clone)]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub deadline: Option<NaiveDate>,
    pub assigned_employee_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task joined with the assignee's display name
#[derive(Debug, Clone)]
pub struct TaskWithAssignee {
    pub task: Task,
    pub assigned_employee_name: Option<String>,
}

/// Field set for inserting a new task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub deadline: Option<NaiveDate>,
    pub assigned_employee_id: Option<i32>,
}

/// Create/update request body. `status` is a free string validated by the
/// service so an unknown value maps to 400 rather than a decode failure.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[validate(length(min = 1, max = 100, message = "Task title is required"))]
    pub title: String,

    pub description: Option<String>,

    pub status: Option<String>,

    pub deadline: Option<NaiveDate>,

    pub assigned_employee_id: Option<i32>,
}

/// Task response DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub deadline: Option<NaiveDate>,
    pub assigned_employee_id: Option<i32>,
    pub assigned_employee_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskWithAssignee> for TaskResponse {
    fn from(record: TaskWithAssignee) -> Self {
        let TaskWithAssignee {
            task,
            assigned_employee_name,
        } = record;
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            deadline: task.deadline,
            assigned_employee_id: task.assigned_employee_id,
            assigned_employee_name,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}
