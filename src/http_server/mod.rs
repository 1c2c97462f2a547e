//! # HTTP Server Module
//!
//! JSON API over the auth and event services, built on axum.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/auth/*` - Login and current user
//! - `/api/user/*` - Accounts
//! - `/api/event/*` - Event catalog
//! - `/api/admin/events/*` - Event and form administration
//! - `/api/participant/*` - Participants, availability, comments
//! - `/api/registration/*` - Form submissions

pub mod admin_routes;
pub mod auth_routes;
pub mod config;
pub mod errors;
pub mod event_routes;
pub mod observability_routes;
pub mod participant_routes;
pub mod registration_routes;
pub mod server;
pub mod state;
pub mod user_routes;

pub use config::HttpServerConfig;
pub use errors::ErrorResponse;
pub use server::{build_router, HttpServer};
pub use state::AppState;
