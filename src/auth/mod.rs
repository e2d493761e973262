//! Authentication and authorization module

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtService, TokenError};
pub use middleware::{authenticate, extract_token, require_admin, require_authenticated, AuthContext};
pub use password::PasswordHasher;
