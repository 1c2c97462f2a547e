//! Listener and browser-access settings
//!
//! The `server` section of the eventdesk config file. Every key is optional:
//!
//! ```json
//! {"host": "0.0.0.0", "port": 8080, "cors_origins": ["http://localhost:5173"]}
//! ```

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::observability::{Event, Logger};

/// Where the event API listens and which front ends may call it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Interface to bind (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind (default: 8080, overridable with `serve --port`)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins of the admin and participant front ends; an empty list lets any origin in
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl HttpServerConfig {
    /// Replace the configured port when one is given on the command line
    pub fn override_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty()
    }

    /// CORS policy for the API.
    ///
    /// Origins that do not parse as header values are skipped and logged.
    pub fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
        if self.allows_any_origin() {
            return layer.allow_origin(Any);
        }

        let mut origins = Vec::with_capacity(self.cors_origins.len());
        for origin in &self.cors_origins {
            match origin.parse::<HeaderValue>() {
                Ok(value) => origins.push(value),
                Err(_) => Logger::event(Event::CorsOriginSkipped, &[("origin", origin.as_str())]),
            }
        }
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpServerConfig::default();
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: HttpServerConfig = serde_json::from_str(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:9000");
        assert_eq!(config.cors_origins, default_cors_origins());
    }

    #[test]
    fn test_empty_origin_list_allows_any() {
        let config: HttpServerConfig = serde_json::from_str(r#"{"cors_origins": []}"#).unwrap();
        assert!(config.allows_any_origin());
        let _layer = config.cors_layer();
    }

    #[test]
    fn test_port_override() {
        let config = HttpServerConfig::default().override_port(Some(9100));
        assert_eq!(config.port, 9100);
        assert_eq!(config.override_port(None).port, 9100);
    }
}
