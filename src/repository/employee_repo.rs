//! Postgres employee repository

use crate::{
    error::AppError,
    models::employee::{Employee, NewEmployee},
    repository::EmployeeRepository,
};
use async_trait::async_trait;
use sqlx::PgPool;

/// Columns of the employees table, aliased to the domain field names
const EMPLOYEE_COLUMNS: &str = "employee_id AS id, first_name, last_name, email, username, \
     password_hash, role, admin, created_at, updated_at";

pub struct PgEmployeeRepository {
    db: PgPool,
}

impl PgEmployeeRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(sqlx::FromRow)]
struct EmployeeWithCountRow {
    #[sqlx(flatten)]
    employee: Employee,
    task_count: i64,
}

/// Translate constraint violations on insert/update into client errors
fn map_constraint_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return AppError::Validation("Username or email already in use.".to_string());
        }
    }
    AppError::Database(e)
}

#[async_trait]
impl EmployeeRepository for PgEmployeeRepository {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_one(&self.db).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(employee)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(employee)
    }

    async fn list_with_task_count(&self) -> Result<Vec<(Employee, i64)>, AppError> {
        let rows = sqlx::query_as::<_, EmployeeWithCountRow>(
            r#"
            SELECT
                e.employee_id AS id,
                e.first_name,
                e.last_name,
                e.email,
                e.username,
                e.password_hash,
                e.role,
                e.admin,
                e.created_at,
                e.updated_at,
                COUNT(t.task_id) AS task_count
            FROM employees e
            LEFT JOIN tasks t ON t.assigned_employee_id = e.employee_id
            GROUP BY e.employee_id
            ORDER BY e.last_name, e.first_name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.employee, row.task_count))
            .collect())
    }

    async fn insert(&self, employee: NewEmployee) -> Result<Employee, AppError> {
        let inserted = sqlx::query_as::<_, Employee>(&format!(
            r#"
            INSERT INTO employees (first_name, last_name, email, username, password_hash, role, admin)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(&employee.username)
        .bind(&employee.password_hash)
        .bind(&employee.role)
        .bind(employee.admin)
        .fetch_one(&self.db)
        .await
        .map_err(map_constraint_error)?;

        Ok(inserted)
    }

    async fn update(&self, employee: &Employee) -> Result<Employee, AppError> {
        let updated = sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE employees
            SET
                first_name = $2,
                last_name = $3,
                email = $4,
                username = $5,
                password_hash = $6,
                role = $7,
                admin = $8,
                updated_at = NOW()
            WHERE employee_id = $1
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(employee.id)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(&employee.username)
        .bind(&employee.password_hash)
        .bind(&employee.role)
        .bind(employee.admin)
        .fetch_optional(&self.db)
        .await
        .map_err(map_constraint_error)?;

        updated.ok_or_else(|| AppError::not_found("Employee not found"))
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET password_hash = $2, updated_at = NOW()
            WHERE employee_id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE employee_id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let found: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM employees WHERE employee_id = $1")
                .bind(id)
                .fetch_optional(&self.db)
                .await?;

        Ok(found.is_some())
    }
}
