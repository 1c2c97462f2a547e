//! # Auth Service
//!
//! Login, user management and token verification behind one facade.

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::crypto::PasswordPolicy;
use super::errors::{AuthError, AuthResult};
use super::jwt::{Identity, JwtConfig, JwtManager};
use super::user::{CreateUserRequest, LoginRequest, Role, User, UserRepository};

/// Login result returned to client
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub role: Role,
    pub redirect_url: String,
}

/// Auth service combining all auth components
pub struct AuthService<U: UserRepository> {
    user_repo: Arc<U>,
    jwt_manager: JwtManager,
    password_policy: PasswordPolicy,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: Arc<U>, jwt_config: JwtConfig, password_policy: PasswordPolicy) -> Self {
        Self {
            user_repo,
            jwt_manager: JwtManager::new(jwt_config),
            password_policy,
        }
    }

    /// Authenticate a user by email and password
    pub fn login(&self, request: LoginRequest) -> AuthResult<LoginResponse> {
        let user = self
            .user_repo
            .find_by_email(&request.email)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.verify_password(&request.password)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt_manager.generate_access_token(&user)?;

        Ok(LoginResponse {
            token,
            token_type: "bearer".to_string(),
            expires_in: self.jwt_manager.ttl_seconds(),
            role: user.role,
            redirect_url: user.role.redirect_url().to_string(),
        })
    }

    /// Register a new user.
    ///
    /// Anyone may create a participant; creating an administrator requires an
    /// administrator caller.
    pub fn create_user(
        &self,
        request: CreateUserRequest,
        caller: Option<&Identity>,
    ) -> AuthResult<User> {
        let role = match request.role.as_deref() {
            Some(role) => role.parse::<Role>()?,
            None => Role::Participant,
        };

        if role == Role::Admin {
            match caller {
                Some(identity) => identity.require_admin()?,
                None => return Err(AuthError::AuthenticationRequired),
            }
        }

        if self.user_repo.find_by_email(&request.email)?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let user = User::new(
            request.name,
            request.email,
            &request.password,
            role,
            &self.password_policy,
        )?;
        self.user_repo.create(&user)?;

        Ok(user)
    }

    /// Make sure an administrator with this email exists.
    ///
    /// Returns the existing user untouched if the email is already taken.
    pub fn seed_admin(&self, name: &str, email: &str, password: &str) -> AuthResult<User> {
        if let Some(existing) = self.user_repo.find_by_email(email)? {
            return Ok(existing);
        }

        let user = User::new(
            name.to_string(),
            email.to_string(),
            password,
            Role::Admin,
            &self.password_policy,
        )?;
        self.user_repo.create(&user)?;

        Ok(user)
    }

    pub fn get_user(&self, user_id: Uuid) -> AuthResult<User> {
        self.user_repo
            .find_by_id(user_id)?
            .ok_or(AuthError::UserNotFound)
    }

    pub fn list_users(&self) -> AuthResult<Vec<User>> {
        self.user_repo.list()
    }

    /// Verify a bearer token and return the caller's identity
    pub fn authenticate(&self, token: &str) -> AuthResult<Identity> {
        self.jwt_manager.identity(token)
    }
}
