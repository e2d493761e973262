//! API documentation handler
//! Serves the OpenAPI description of the public surface

use axum::Json;
use serde_json::{json, Value};

/// OpenAPI 3 document for the service
pub async fn api_docs() -> Json<Value> {
    Json(json!({
        "openapi": "3.0.3",
        "info": {
            "title": "ETAMS API",
            "description": "Employee task assignment and management service",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "components": {
            "securitySchemes": {
                "bearerAuth": { "type": "http", "scheme": "bearer", "bearerFormat": "JWT" }
            }
        },
        "paths": {
            "/auth/login": {
                "post": {
                    "summary": "Authenticate and receive a bearer token",
                    "responses": {
                        "200": { "description": "Token issued" },
                        "400": { "description": "Username or password missing" },
                        "401": { "description": "Incorrect password" },
                        "404": { "description": "Unknown username" }
                    }
                }
            },
            "/api/employees": {
                "get": {
                    "summary": "List employees with task counts (admin)",
                    "security": [{ "bearerAuth": [] }],
                    "responses": { "200": { "description": "Employee list" } }
                },
                "post": {
                    "summary": "Create an employee (admin)",
                    "security": [{ "bearerAuth": [] }],
                    "responses": { "200": { "description": "Created employee" } }
                }
            },
            "/api/employees/{id}": {
                "put": {
                    "summary": "Update an employee (admin)",
                    "security": [{ "bearerAuth": [] }],
                    "responses": { "200": { "description": "Updated employee" } }
                },
                "delete": {
                    "summary": "Delete an employee (admin)",
                    "security": [{ "bearerAuth": [] }],
                    "responses": { "204": { "description": "Deleted" } }
                }
            },
            "/api/employees/{id}/password": {
                "put": {
                    "summary": "Replace an employee's password (admin)",
                    "security": [{ "bearerAuth": [] }],
                    "responses": { "204": { "description": "Password updated" } }
                }
            },
            "/api/tasks": {
                "get": {
                    "summary": "List tasks",
                    "security": [{ "bearerAuth": [] }],
                    "responses": { "200": { "description": "Task list" } }
                },
                "post": {
                    "summary": "Create a task",
                    "security": [{ "bearerAuth": [] }],
                    "responses": { "200": { "description": "Created task" } }
                }
            },
            "/api/tasks/user/{employeeId}": {
                "get": {
                    "summary": "List tasks assigned to an employee",
                    "security": [{ "bearerAuth": [] }],
                    "responses": { "200": { "description": "Task list" } }
                }
            },
            "/api/tasks/{id}": {
                "put": {
                    "summary": "Update a task",
                    "security": [{ "bearerAuth": [] }],
                    "responses": { "200": { "description": "Updated task" } }
                },
                "delete": {
                    "summary": "Delete a task",
                    "security": [{ "bearerAuth": [] }],
                    "responses": { "204": { "description": "Deleted" } }
                }
            },
            "/health": {
                "get": { "summary": "Liveness probe", "responses": { "200": { "description": "Alive" } } }
            },
            "/ready": {
                "get": { "summary": "Readiness probe", "responses": { "200": { "description": "Readiness state" } } }
            }
        }
    }))
}
