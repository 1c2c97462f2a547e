//! # Auth Errors
//!
//! Error types for the authentication module.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and authorization errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // ==================
    // Authentication Errors
    // ==================

    /// Unknown email or wrong password (generic - don't leak which)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Email already registered
    #[error("Email already exists")]
    EmailAlreadyExists,

    /// Email does not look like an address
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Name is blank
    #[error("Name is required")]
    NameRequired,

    /// Unrecognized role string
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Password does not meet requirements
    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    /// No user with the given ID
    #[error("User not found")]
    UserNotFound,

    // ==================
    // JWT Errors
    // ==================

    /// JWT token is malformed
    #[error("Malformed token")]
    MalformedToken,

    /// JWT token has expired
    #[error("Token expired")]
    TokenExpired,

    /// JWT signature is invalid
    #[error("Invalid token signature")]
    InvalidSignature,

    // ==================
    // Access Errors
    // ==================

    /// Request carried no bearer token
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Caller's role does not allow this operation
    #[error("Not authorized to access this resource")]
    Forbidden,

    // ==================
    // Internal Errors
    // ==================

    /// Password hashing failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// Token generation failed
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,

    /// Storage operation failed
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            AuthError::InvalidEmail(_) => 400,
            AuthError::NameRequired => 400,
            AuthError::UnknownRole(_) => 400,
            AuthError::WeakPassword(_) => 400,

            // 401 Unauthorized
            AuthError::InvalidCredentials => 401,
            AuthError::MalformedToken => 401,
            AuthError::TokenExpired => 401,
            AuthError::InvalidSignature => 401,
            AuthError::AuthenticationRequired => 401,

            // 403 Forbidden
            AuthError::Forbidden => 403,

            // 404 Not Found
            AuthError::UserNotFound => 404,

            // 409 Conflict
            AuthError::EmailAlreadyExists => 409,

            // 500 Internal Server Error
            AuthError::HashingFailed => 500,
            AuthError::TokenGenerationFailed => 500,
            AuthError::StorageError(_) => 500,
        }
    }

    /// Returns whether this error is the caller's fault
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
