//! CLI module for eventdesk
//!
//! Provides command-line interface for:
//! - serve: Load configuration and run the HTTP API
//! - validate: Check answers against a form offline
//! - check-config: Validate a configuration file

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{boot_state, check_config, run, run_command, serve, validate, validate_form};
pub use config::{AppConfig, BootstrapAdmin, JwtSettings, JWT_SECRET_ENV};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_file, write_rejection, write_response};
