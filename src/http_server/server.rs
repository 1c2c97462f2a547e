//! # HTTP Server
//!
//! Combines all endpoint routers behind CORS and request logging.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;

use crate::observability::{Event, Logger};

use super::admin_routes::admin_routes;
use super::auth_routes::auth_routes;
use super::config::HttpServerConfig;
use super::event_routes::event_routes;
use super::observability_routes::{health_routes, log_requests};
use super::participant_routes::participant_routes;
use super::registration_routes::registration_routes;
use super::state::AppState;
use super::user_routes::user_routes;

/// HTTP server for the event API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server with fresh in-memory state
    pub fn new(config: HttpServerConfig) -> Self {
        Self::with_state(config, Arc::new(AppState::default()))
    }

    /// Create a server over existing state
    pub fn with_state(config: HttpServerConfig, state: Arc<AppState>) -> Self {
        let router = build_router(&config, state);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        let bound = listener.local_addr()?.to_string();
        Logger::event(Event::Serving, &[("addr", bound.as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Logger::event(Event::ShutdownComplete, &[]);
        Ok(())
    }
}

/// Build the combined router with all endpoints
pub fn build_router(config: &HttpServerConfig, state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health_routes())
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/user", user_routes(state.clone()))
        .nest("/api/event", event_routes(state.clone()))
        .nest("/api/admin/events", admin_routes(state.clone()))
        .nest("/api/participant", participant_routes(state.clone()))
        .nest("/api/registration", registration_routes(state))
        .layer(middleware::from_fn(log_requests))
        .layer(config.cors_layer())
}

async fn shutdown_signal() {
    // If the handler cannot be installed, serve until the process is killed
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
