//! Shared state handed to every router

use std::sync::Arc;

use crate::auth::{AuthService, InMemoryUserRepository, JwtConfig, PasswordPolicy};
use crate::events::{EventService, InMemoryEventRepository};

pub type AppAuthService = AuthService<InMemoryUserRepository>;
pub type AppEventService = EventService<InMemoryEventRepository, InMemoryUserRepository>;

/// Services backing the API. Both share one user store.
pub struct AppState {
    pub auth: AppAuthService,
    pub events: AppEventService,
}

impl AppState {
    pub fn new(jwt_config: JwtConfig, password_policy: PasswordPolicy) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        Self {
            auth: AuthService::new(Arc::clone(&users), jwt_config, password_policy),
            events: EventService::new(Arc::new(InMemoryEventRepository::new()), users),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(JwtConfig::default(), PasswordPolicy::default())
    }
}
