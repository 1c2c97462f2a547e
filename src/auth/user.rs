//! # User Management
//!
//! User model and repository. Every user is either an administrator, who
//! manages events and forms, or a participant, who registers for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::crypto::{hash_password, validate_email, verify_password, PasswordPolicy};
use super::errors::{AuthError, AuthResult};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Participant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Participant => "participant",
        }
    }

    /// Landing page the client should open after login
    pub fn redirect_url(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Participant => "/participant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "participant" => Ok(Role::Participant),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    pub name: String,

    /// Email address (unique)
    pub email: String,

    pub role: Role,

    /// Argon2id password hash (never plaintext)
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user, checking the name, email shape and password policy
    pub fn new(
        name: String,
        email: String,
        password: &str,
        role: Role,
        policy: &PasswordPolicy,
    ) -> AuthResult<Self> {
        if name.trim().is_empty() {
            return Err(AuthError::NameRequired);
        }
        let email = email.trim().to_string();
        validate_email(&email)?;
        policy.validate(password)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email,
            role,
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        })
    }

    /// Verify a password against this user's stored hash
    pub fn verify_password(&self, password: &str) -> AuthResult<bool> {
        verify_password(password, &self.password_hash)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// User creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// User login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User repository trait
///
/// Abstracts storage operations for users.
pub trait UserRepository: Send + Sync {
    /// Find a user by their ID
    fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>>;

    /// Find a user by their email (case-insensitive)
    fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// All users, in creation order
    fn list(&self) -> AuthResult<Vec<User>>;

    /// All users holding the given role
    fn list_by_role(&self, role: Role) -> AuthResult<Vec<User>>;

    /// Create a new user
    fn create(&self, user: &User) -> AuthResult<()>;
}

/// In-memory user repository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: std::sync::RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned<T>(_: T) -> AuthError {
    AuthError::StorageError("Lock poisoned".to_string())
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        let users = self.users.read().map_err(lock_poisoned)?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let users = self.users.read().map_err(lock_poisoned)?;
        let email = email.trim();
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn list(&self) -> AuthResult<Vec<User>> {
        let users = self.users.read().map_err(lock_poisoned)?;
        Ok(users.clone())
    }

    fn list_by_role(&self, role: Role) -> AuthResult<Vec<User>> {
        let users = self.users.read().map_err(lock_poisoned)?;
        Ok(users.iter().filter(|u| u.role == role).cloned().collect())
    }

    fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().map_err(lock_poisoned)?;

        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AuthError::EmailAlreadyExists);
        }

        users.push(user.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(email: &str) -> User {
        User::new(
            "Test User".to_string(),
            email.to_string(),
            "password123",
            Role::Participant,
            &PasswordPolicy::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_user_creation() {
        let user = participant("test@example.com");

        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.role, Role::Participant);
        assert_ne!(user.password_hash, "password123");
        assert!(user.verify_password("password123").unwrap());
        assert!(!user.verify_password("wrong_password").unwrap());
    }

    #[test]
    fn test_user_creation_checks_input() {
        let policy = PasswordPolicy::default();
        assert!(matches!(
            User::new(" ".into(), "a@b.co".into(), "password123", Role::Admin, &policy),
            Err(AuthError::NameRequired)
        ));
        assert!(matches!(
            User::new("A".into(), "nope".into(), "password123", Role::Admin, &policy),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            User::new("A".into(), "a@b.co".into(), "short", Role::Admin, &policy),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" Participant ".parse::<Role>().unwrap(), Role::Participant);
        assert!(matches!("owner".parse::<Role>(), Err(AuthError::UnknownRole(_))));
        assert_eq!(Role::Admin.redirect_url(), "/admin");
    }

    #[test]
    fn test_in_memory_repository() {
        let repo = InMemoryUserRepository::new();
        let user = participant("test@example.com");
        let user_id = user.id;

        repo.create(&user).unwrap();

        assert!(repo.find_by_id(user_id).unwrap().is_some());
        assert!(repo.find_by_email("TEST@example.com").unwrap().is_some());
        assert!(repo.find_by_email("other@example.com").unwrap().is_none());
        assert_eq!(repo.list_by_role(Role::Participant).unwrap().len(), 1);
        assert!(repo.list_by_role(Role::Admin).unwrap().is_empty());

        let duplicate = participant("Test@Example.com");
        assert!(matches!(
            repo.create(&duplicate),
            Err(AuthError::EmailAlreadyExists)
        ));
    }

    #[test]
    fn test_user_serialization_omits_password() {
        let user = participant("test@example.com");
        let json = serde_json::to_string(&user).unwrap();

        assert!(!json.contains("password_hash"));
        assert!(!json.contains(&user.password_hash));
        assert!(json.contains("\"role\":\"participant\""));
    }
}
