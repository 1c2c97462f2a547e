//! CLI argument definitions using clap
//!
//! Commands:
//! - eventdesk serve --config <path>
//! - eventdesk validate --form <path> --answers <path>
//! - eventdesk check-config --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// eventdesk - event management API with validated registration forms
#[derive(Parser, Debug)]
#[command(name = "eventdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./eventdesk.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate a set of answers against a form offline
    Validate {
        /// JSON array of questions
        #[arg(long)]
        form: PathBuf,

        /// JSON array of answers
        #[arg(long)]
        answers: PathBuf,
    },

    /// Load and validate a configuration file, then exit
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = "./eventdesk.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
