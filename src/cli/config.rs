//! Configuration file
//!
//! JSON, every section optional except the JWT secret, which may also come
//! from `EVENTDESK_JWT_SECRET`.

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::auth::{JwtConfig, PasswordPolicy};
use crate::http_server::HttpServerConfig;
use crate::observability::Severity;

use super::errors::{CliError, CliResult};

/// Environment variable overriding `jwt.secret`
pub const JWT_SECRET_ENV: &str = "EVENTDESK_JWT_SECRET";

/// Longest accepted access token lifetime (one year)
pub const MAX_TOKEN_TTL_SECONDS: i64 = 365 * 86_400;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub jwt: JwtSettings,

    /// Minimum password length for new accounts (default: 8)
    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,

    /// Require at least one digit in new passwords (default: false)
    #[serde(default)]
    pub password_require_number: bool,

    /// Lowest severity written to the log (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Administrator created at startup if the email is not taken yet
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtSettings {
    #[serde(default)]
    pub secret: String,

    #[serde(default = "default_issuer")]
    pub issuer: String,

    #[serde(default = "default_issuer")]
    pub audience: String,

    /// Access token lifetime in seconds (default: one day)
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    #[serde(default = "default_admin_name")]
    pub name: String,
    pub email: String,
    pub password: String,
}

fn default_password_min_length() -> usize {
    8
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_issuer() -> String {
    "eventdesk".to_string()
}
fn default_token_ttl() -> i64 {
    86_400
}
fn default_admin_name() -> String {
    "Administrator".to_string()
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
            issuer: default_issuer(),
            audience: default_issuer(),
            token_ttl_seconds: default_token_ttl(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file, apply the environment override, validate
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config = Self::from_json(&content)?
            .with_secret_override(std::env::var(JWT_SECRET_ENV).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parse without validating
    pub fn from_json(content: &str) -> CliResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// Replace the JWT secret if an override is given
    pub fn with_secret_override(mut self, secret: Option<String>) -> Self {
        if let Some(secret) = secret {
            self.jwt.secret = secret;
        }
        self
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.jwt.secret.trim().is_empty() {
            return Err(CliError::config_error(format!(
                "jwt.secret must not be blank (set it in the config or via {})",
                JWT_SECRET_ENV
            )));
        }

        self.token_ttl()?;

        if self.password_min_length == 0 {
            return Err(CliError::config_error("password_min_length must be > 0"));
        }

        self.severity()?;

        if let Some(admin) = &self.bootstrap_admin {
            if admin.email.trim().is_empty() {
                return Err(CliError::config_error("bootstrap_admin.email must not be blank"));
            }
            if admin.password.chars().count() < self.password_min_length {
                return Err(CliError::config_error(format!(
                    "bootstrap_admin.password must be at least {} characters",
                    self.password_min_length
                )));
            }
        }

        Ok(())
    }

    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// Access token lifetime, bounded to `1..=MAX_TOKEN_TTL_SECONDS`
    pub fn token_ttl(&self) -> CliResult<Duration> {
        let seconds = self.jwt.token_ttl_seconds;
        if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&seconds) {
            return Err(CliError::config_error(format!(
                "jwt.token_ttl_seconds must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_SECONDS, seconds
            )));
        }

        Duration::try_seconds(seconds).ok_or_else(|| {
            CliError::config_error(format!("jwt.token_ttl_seconds out of range: {}", seconds))
        })
    }

    pub fn jwt_config(&self) -> CliResult<JwtConfig> {
        Ok(JwtConfig {
            secret: self.jwt.secret.clone(),
            access_token_ttl: self.token_ttl()?,
            issuer: self.jwt.issuer.clone(),
            audience: self.jwt.audience.clone(),
        })
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy {
            min_length: self.password_min_length,
            require_number: self.password_require_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config = AppConfig::from_json(r#"{"jwt": {"secret": "s3cret"}}"#).unwrap();
        config.validate().unwrap();

        assert_eq!(config.server, HttpServerConfig::default());
        assert_eq!(config.password_min_length, 8);
        assert_eq!(config.jwt_config().unwrap().access_token_ttl, Duration::days(1));
        assert!(!config.password_policy().require_number);
        assert_eq!(config.severity().unwrap(), Severity::Info);
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn test_blank_secret_rejected() {
        let config = AppConfig::from_json("{}").unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.code_str(), "EVENTDESK_CLI_CONFIG_ERROR");
        assert!(err.message().contains(JWT_SECRET_ENV));
    }

    #[test]
    fn test_secret_override() {
        let config = AppConfig::from_json(r#"{"jwt": {"secret": "from-file"}}"#)
            .unwrap()
            .with_secret_override(Some("from-env".to_string()));
        assert_eq!(config.jwt.secret, "from-env");

        // A blank override still fails validation
        let config = config.with_secret_override(Some("  ".to_string()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_override_keeps_file_secret() {
        let config = AppConfig::from_json(r#"{"jwt": {"secret": "from-file"}}"#)
            .unwrap()
            .with_secret_override(None);
        assert_eq!(config.jwt.secret, "from-file");
    }

    #[test]
    fn test_token_ttl_bounds() {
        for ttl in ["0", "-5", "31536001", "10000000000000", "9223372036854775807"] {
            let config = AppConfig::from_json(&format!(
                r#"{{"jwt": {{"secret": "s", "token_ttl_seconds": {}}}}}"#,
                ttl
            ))
            .unwrap();
            assert!(config.validate().is_err(), "ttl {} accepted", ttl);
            assert!(config.jwt_config().is_err(), "ttl {} accepted", ttl);
        }

        let config =
            AppConfig::from_json(r#"{"jwt": {"secret": "s", "token_ttl_seconds": 31536000}}"#)
                .unwrap();
        config.validate().unwrap();
        assert_eq!(config.jwt_config().unwrap().access_token_ttl, Duration::days(365));
    }

    #[test]
    fn test_password_require_number() {
        let config =
            AppConfig::from_json(r#"{"jwt": {"secret": "s"}, "password_require_number": true}"#)
                .unwrap();
        let policy = config.password_policy();
        assert!(policy.validate("no-digits-here").is_err());
        assert!(policy.validate("digits-4-here").is_ok());
    }

    #[test]
    fn test_bad_log_level() {
        let config =
            AppConfig::from_json(r#"{"jwt": {"secret": "x"}, "log_level": "chatty"}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_short_bootstrap_password() {
        let config = AppConfig::from_json(
            r#"{"jwt": {"secret": "x"}, "bootstrap_admin": {"email": "a@b.io", "password": "short"}}"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_json() {
        assert!(AppConfig::from_json("{").is_err());
    }
}
