//! # Auth Module
//!
//! User accounts, password hashing and JWT access tokens. Handlers only ever
//! see an [`Identity`] recovered from a verified token.

pub mod api;
pub mod crypto;
pub mod errors;
pub mod jwt;
pub mod user;

pub use api::{AuthService, LoginResponse};
pub use crypto::PasswordPolicy;
pub use errors::{AuthError, AuthResult};
pub use jwt::{Identity, JwtClaims, JwtConfig, JwtManager};
pub use user::{CreateUserRequest, InMemoryUserRepository, LoginRequest, Role, User, UserRepository};
