//! Shared test helpers
//! Test config/state builders and an in-memory store implementing the
//! repository traits, so the full router can be driven without Postgres

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use etams::{
    auth::{jwt::JwtService, password::PasswordHasher},
    config::{AppConfig, CorsConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig},
    error::AppError,
    middleware::AppState,
    models::employee::{Employee, NewEmployee},
    models::task::{NewTask, Task, TaskWithAssignee},
    repository::{EmployeeRepository, TaskRepository},
    services::{AuthService, EmployeeService, TaskService},
};
use http_body_util::BodyExt;
use secrecy::Secret;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

/// Test configuration: real 24h token lifetime, small Argon2 memory cost so
/// the suite stays fast
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
        },
        database: DatabaseConfig {
            url: Secret::new("postgresql://localhost/etams_test".to_string()),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new(TEST_JWT_SECRET.to_string()),
            token_exp_secs: 86_400,
            credential_lookup_timeout_secs: 5,
            argon2_memory_kib: 4096,
            argon2_iterations: 3,
            argon2_parallelism: 1,
            password_min_length: 8,
            password_require_uppercase: true,
            password_require_digit: true,
            password_require_special: true,
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:4200".to_string()],
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "PUT".to_string(),
                "DELETE".to_string(),
                "OPTIONS".to_string(),
            ],
            allowed_headers: vec!["Authorization".to_string(), "Content-Type".to_string()],
            max_age_secs: 3600,
        },
    }
}

/// In-memory credential/task store, substituting for Postgres behind the
/// repository traits
#[derive(Default)]
pub struct InMemoryStore {
    employees: RwLock<HashMap<i32, Employee>>,
    tasks: RwLock<HashMap<i32, Task>>,
    next_employee_id: AtomicI32,
    next_task_id: AtomicI32,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            employees: RwLock::new(HashMap::new()),
            tasks: RwLock::new(HashMap::new()),
            next_employee_id: AtomicI32::new(1),
            next_task_id: AtomicI32::new(1),
        })
    }

    /// Remove an employee directly, bypassing the HTTP surface
    pub async fn remove_employee(&self, id: i32) {
        self.employees.write().await.remove(&id);
    }

    /// Flip the stored admin flag directly, bypassing the HTTP surface
    pub async fn set_admin(&self, id: i32, admin: bool) {
        if let Some(employee) = self.employees.write().await.get_mut(&id) {
            employee.admin = admin;
        }
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, AppError> {
        Ok(self.employees.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Employee>, AppError> {
        Ok(self
            .employees
            .read()
            .await
            .values()
            .find(|e| e.username == username)
            .cloned())
    }

    async fn list_with_task_count(&self) -> Result<Vec<(Employee, i64)>, AppError> {
        let employees = self.employees.read().await;
        let tasks = self.tasks.read().await;

        let mut result: Vec<(Employee, i64)> = employees
            .values()
            .map(|e| {
                let count = tasks
                    .values()
                    .filter(|t| t.assigned_employee_id == Some(e.id))
                    .count() as i64;
                (e.clone(), count)
            })
            .collect();
        result.sort_by(|a, b| {
            (a.0.last_name.as_str(), a.0.first_name.as_str())
                .cmp(&(b.0.last_name.as_str(), b.0.first_name.as_str()))
        });

        Ok(result)
    }

    async fn insert(&self, employee: NewEmployee) -> Result<Employee, AppError> {
        let mut employees = self.employees.write().await;

        if employees
            .values()
            .any(|e| e.username == employee.username || e.email == employee.email)
        {
            return Err(AppError::Validation(
                "Username or email already in use.".to_string(),
            ));
        }

        let id = self.next_employee_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let record = Employee {
            id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            username: employee.username,
            password_hash: employee.password_hash,
            role: employee.role,
            admin: employee.admin,
            created_at: now,
            updated_at: now,
        };
        employees.insert(id, record.clone());

        Ok(record)
    }

    async fn update(&self, employee: &Employee) -> Result<Employee, AppError> {
        let mut employees = self.employees.write().await;

        if employees
            .values()
            .any(|e| e.id != employee.id && (e.username == employee.username || e.email == employee.email))
        {
            return Err(AppError::Validation(
                "Username or email already in use.".to_string(),
            ));
        }

        let existing = employees
            .get_mut(&employee.id)
            .ok_or_else(|| AppError::not_found("Employee not found"))?;

        let mut updated = employee.clone();
        updated.created_at = existing.created_at;
        updated.updated_at = Utc::now();
        *existing = updated.clone();

        Ok(updated)
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<bool, AppError> {
        let mut employees = self.employees.write().await;
        match employees.get_mut(&id) {
            Some(employee) => {
                employee.password_hash = password_hash.to_string();
                employee.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let removed = self.employees.write().await.remove(&id).is_some();
        if removed {
            // ON DELETE SET NULL
            for task in self.tasks.write().await.values_mut() {
                if task.assigned_employee_id == Some(id) {
                    task.assigned_employee_id = None;
                }
            }
        }
        Ok(removed)
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.employees.read().await.contains_key(&id))
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn find_with_assignee(&self, id: i32) -> Result<Option<TaskWithAssignee>, AppError> {
        let task = match self.tasks.read().await.get(&id).cloned() {
            Some(task) => task,
            None => return Ok(None),
        };
        Ok(Some(self.with_assignee(task).await))
    }

    async fn list(&self) -> Result<Vec<TaskWithAssignee>, AppError> {
        let mut tasks: Vec<Task> = self.tasks.read().await.values().cloned().collect();
        tasks.sort_by_key(|t| t.id);

        let mut result = Vec::with_capacity(tasks.len());
        for task in tasks {
            result.push(self.with_assignee(task).await);
        }
        Ok(result)
    }

    async fn list_by_employee(&self, employee_id: i32) -> Result<Vec<TaskWithAssignee>, AppError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|t| t.assigned_employee_id == Some(employee_id))
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.id);

        let mut result = Vec::with_capacity(tasks.len());
        for task in tasks {
            result.push(self.with_assignee(task).await);
        }
        Ok(result)
    }

    async fn insert(&self, task: NewTask) -> Result<Task, AppError> {
        if let Some(employee_id) = task.assigned_employee_id {
            if !self.employees.read().await.contains_key(&employee_id) {
                return Err(AppError::not_found("Employee not found"));
            }
        }

        let id = self.next_task_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let record = Task {
            id,
            title: task.title,
            description: task.description,
            status: task.status,
            deadline: task.deadline,
            assigned_employee_id: task.assigned_employee_id,
            created_at: now,
            updated_at: now,
        };
        self.tasks.write().await.insert(id, record.clone());

        Ok(record)
    }

    async fn update(&self, task: &Task) -> Result<Task, AppError> {
        if let Some(employee_id) = task.assigned_employee_id {
            if !self.employees.read().await.contains_key(&employee_id) {
                return Err(AppError::not_found("Employee not found"));
            }
        }

        let mut tasks = self.tasks.write().await;
        let existing = tasks
            .get_mut(&task.id)
            .ok_or_else(|| AppError::not_found("Task not found"))?;

        let mut updated = task.clone();
        updated.created_at = existing.created_at;
        updated.updated_at = Utc::now();
        *existing = updated.clone();

        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.tasks.write().await.remove(&id).is_some())
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.tasks.read().await.contains_key(&id))
    }
}

impl InMemoryStore {
    async fn with_assignee(&self, task: Task) -> TaskWithAssignee {
        let assigned_employee_name = match task.assigned_employee_id {
            Some(id) => self
                .employees
                .read()
                .await
                .get(&id)
                .map(|e| e.full_name()),
            None => None,
        };
        TaskWithAssignee {
            task,
            assigned_employee_name,
        }
    }
}

/// Build the full application state on top of the in-memory store
pub fn create_test_state(store: Arc<InMemoryStore>) -> Arc<AppState> {
    let config = create_test_config();

    let employee_repo: Arc<dyn EmployeeRepository> = store.clone();
    let task_repo: Arc<dyn TaskRepository> = store;

    let jwt_service = Arc::new(JwtService::from_config(&config).expect("jwt service"));
    let password_hasher =
        Arc::new(PasswordHasher::from_config(&config.security).expect("password hasher"));
    let shared_config = Arc::new(config.clone());

    Arc::new(AppState {
        config,
        jwt_service: jwt_service.clone(),
        auth_service: Arc::new(AuthService::new(
            employee_repo.clone(),
            jwt_service,
            password_hasher.clone(),
            shared_config.clone(),
        )),
        employee_service: Arc::new(EmployeeService::new(
            employee_repo.clone(),
            task_repo.clone(),
            password_hasher,
            shared_config,
        )),
        task_service: Arc::new(TaskService::new(task_repo, employee_repo.clone())),
        employee_repo,
    })
}

/// Seed an employee with a hashed password; returns the stored record
pub async fn seed_employee(
    store: &Arc<InMemoryStore>,
    username: &str,
    password: &str,
    admin: bool,
) -> Employee {
    let config = create_test_config();
    let hasher = PasswordHasher::from_config(&config.security).expect("password hasher");
    let password_hash = hasher.hash(password).expect("hash password");

    // Both repository traits have an `insert`; name the one we mean
    let repo: &dyn EmployeeRepository = store.as_ref();
    repo.insert(NewEmployee {
        first_name: capitalize(username),
        last_name: "Tester".to_string(),
        email: format!("{}@example.com", username),
        username: username.to_string(),
        password_hash,
        role: if admin { "Manager" } else { "Engineer" }.to_string(),
        admin,
    })
    .await
    .expect("seed employee")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Drive the router with a JSON request
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Log in through the HTTP surface and return the issued token
pub async fn login_token(app: &Router, username: &str, password: &str) -> String {
    let (status, json) = send_json(
        app,
        "POST",
        "/auth/login",
        None,
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {}", json);
    json["token"].as_str().expect("token in response").to_string()
}
