//! Postgres task repository

use crate::{
    error::AppError,
    models::task::{NewTask, Task, TaskStatus, TaskWithAssignee},
    repository::TaskRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

const TASK_COLUMNS: &str = "task_id AS id, title, description, status, deadline, \
     assigned_employee_id, created_at, updated_at";

pub struct PgTaskRepository {
    db: PgPool,
}

impl PgTaskRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Raw row; status is stored as text and decoded leniently
#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i32,
    title: String,
    description: Option<String>,
    status: String,
    deadline: Option<NaiveDate>,
    assigned_employee_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            title: row.title,
            description: row.description,
            status: TaskStatus::from_stored(&row.status),
            deadline: row.deadline,
            assigned_employee_id: row.assigned_employee_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TaskWithAssigneeRow {
    #[sqlx(flatten)]
    task: TaskRow,
    assigned_employee_name: Option<String>,
}

impl From<TaskWithAssigneeRow> for TaskWithAssignee {
    fn from(row: TaskWithAssigneeRow) -> Self {
        TaskWithAssignee {
            task: row.task.into(),
            assigned_employee_name: row.assigned_employee_name,
        }
    }
}

/// SELECT list for task + assignee display name
const TASK_WITH_ASSIGNEE_QUERY: &str = r#"
    SELECT
        t.task_id AS id,
        t.title,
        t.description,
        t.status,
        t.deadline,
        t.assigned_employee_id,
        t.created_at,
        t.updated_at,
        e.first_name || ' ' || e.last_name AS assigned_employee_name
    FROM tasks t
    LEFT JOIN employees e ON e.employee_id = t.assigned_employee_id
"#;

/// Translate a foreign-key violation (assignee vanished between the
/// service's existence check and the write) into the service's 404
fn map_constraint_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if matches!(db_err.kind(), sqlx::error::ErrorKind::ForeignKeyViolation) {
            return AppError::not_found("Employee not found");
        }
    }
    AppError::Database(e)
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, AppError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE task_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Task::from))
    }

    async fn find_with_assignee(&self, id: i32) -> Result<Option<TaskWithAssignee>, AppError> {
        let row = sqlx::query_as::<_, TaskWithAssigneeRow>(&format!(
            "{TASK_WITH_ASSIGNEE_QUERY} WHERE t.task_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(TaskWithAssignee::from))
    }

    async fn list(&self) -> Result<Vec<TaskWithAssignee>, AppError> {
        let rows = sqlx::query_as::<_, TaskWithAssigneeRow>(&format!(
            "{TASK_WITH_ASSIGNEE_QUERY} ORDER BY t.task_id"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(TaskWithAssignee::from).collect())
    }

    async fn list_by_employee(&self, employee_id: i32) -> Result<Vec<TaskWithAssignee>, AppError> {
        let rows = sqlx::query_as::<_, TaskWithAssigneeRow>(&format!(
            "{TASK_WITH_ASSIGNEE_QUERY} WHERE t.assigned_employee_id = $1 ORDER BY t.task_id"
        ))
        .bind(employee_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(TaskWithAssignee::from).collect())
    }

    async fn insert(&self, task: NewTask) -> Result<Task, AppError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            INSERT INTO tasks (title, description, status, deadline, assigned_employee_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.deadline)
        .bind(task.assigned_employee_id)
        .fetch_one(&self.db)
        .await
        .map_err(map_constraint_error)?;

        Ok(row.into())
    }

    async fn update(&self, task: &Task) -> Result<Task, AppError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            UPDATE tasks
            SET
                title = $2,
                description = $3,
                status = $4,
                deadline = $5,
                assigned_employee_id = $6,
                updated_at = NOW()
            WHERE task_id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.deadline)
        .bind(task.assigned_employee_id)
        .fetch_optional(&self.db)
        .await
        .map_err(map_constraint_error)?;

        row.map(Task::from)
            .ok_or_else(|| AppError::not_found("Task not found"))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE task_id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM tasks WHERE task_id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(found.is_some())
    }
}
