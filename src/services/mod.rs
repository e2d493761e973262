//! Business logic services layer

pub mod auth_service;
pub mod employee_service;
pub mod task_service;

pub use auth_service::AuthService;
pub use employee_service::EmployeeService;
pub use task_service::TaskService;
