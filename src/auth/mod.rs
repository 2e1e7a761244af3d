//! Authentication Module
//! Mission: Secure API access with JWT tokens and role-partitioned identities

pub mod error;
pub mod guard;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod resolver;

pub use error::AuthError;
pub use guard::{require_roles, role_guard, RoleGuard};
pub use jwt::{IssuedToken, JwtHandler};
pub use middleware::{auth_middleware, optional_auth_middleware, AuthGate};
pub use models::{Claims, Identity, LoginRequest, LoginResponse, Role};
pub use resolver::RoleResolver;

use anyhow::{Context, Result};

pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost).context("Failed to hash password")
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash).context("Failed to verify password")
}
