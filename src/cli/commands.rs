//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::forms::{validate_and_enrich, Answer, FormDefinition, QuestionSpec};
use crate::http_server::{AppState, HttpServer};
use crate::observability::{Event, Logger};

use super::args::Command;
use super::config::AppConfig;
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{read_json_file, write_rejection, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Validate { form, answers } => validate(&form, &answers),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Boot the service and serve HTTP until interrupted
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    Logger::event(Event::BootStart, &[]);

    let mut config = AppConfig::load(config_path)?;
    config.server = config.server.override_port(port);
    Logger::set_min_severity(config.severity()?);

    let path = config_path.display().to_string();
    Logger::event(Event::ConfigLoaded, &[("path", path.as_str())]);

    let state = Arc::new(boot_state(&config)?);
    let server = HttpServer::with_state(config.server.clone(), state);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Build the service state and seed the bootstrap administrator
pub fn boot_state(config: &AppConfig) -> CliResult<AppState> {
    let state = AppState::new(config.jwt_config()?, config.password_policy());

    if let Some(admin) = &config.bootstrap_admin {
        let user = state
            .auth
            .seed_admin(&admin.name, &admin.email, &admin.password)
            .map_err(|e| CliError::boot_failed(format!("Failed to seed administrator: {}", e)))?;

        let user_id = user.id.to_string();
        Logger::event(
            Event::AdminSeeded,
            &[("email", user.email.as_str()), ("user_id", user_id.as_str())],
        );
    }

    Ok(state)
}

/// Run the form validator over two JSON files.
///
/// Prints the enriched answers on success, every violation otherwise.
pub fn validate(form_path: &Path, answers_path: &Path) -> CliResult<()> {
    let questions: Vec<QuestionSpec> = read_json_file(form_path)?;
    let answers: Vec<Answer> = read_json_file(answers_path)?;

    let result = validate_form(&FormDefinition::new(questions), &answers);
    match result {
        Ok(enriched) => write_response(enriched),
        Err((violations, count)) => {
            write_rejection(CliErrorCode::Rejected.code(), violations)?;
            Err(CliError::rejected(count))
        }
    }
}

/// Validation outcome as JSON: the enriched answers, or the violations and their count
pub fn validate_form(form: &FormDefinition, answers: &[Answer]) -> Result<Value, (Value, usize)> {
    match validate_and_enrich(answers, form) {
        Ok(enriched) => Ok(json!(enriched)),
        Err(errors) => {
            let violations: Vec<Value> = errors
                .errors()
                .iter()
                .map(|e| {
                    json!({
                        "code": e.code(),
                        "question_text": e.question_text(),
                        "message": e.to_string(),
                    })
                })
                .collect();
            Err((Value::Array(violations), errors.len()))
        }
    }
}

/// Load the configuration and report what the server would run with
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = AppConfig::load(config_path)?;

    write_response(json!({
        "addr": config.server.socket_addr(),
        "cors_origins": config.server.cors_origins,
        "jwt_issuer": config.jwt.issuer,
        "jwt_audience": config.jwt.audience,
        "token_ttl_seconds": config.jwt.token_ttl_seconds,
        "password_min_length": config.password_min_length,
        "password_require_number": config.password_require_number,
        "log_level": config.log_level,
        "bootstrap_admin": config.bootstrap_admin.as_ref().map(|a| a.email.clone()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn form() -> FormDefinition {
        FormDefinition::new(vec![
            QuestionSpec::text("Name").required(),
            QuestionSpec::dropdown("Track", ["Web", "Systems"]),
        ])
    }

    #[test]
    fn test_validate_form_accepts() {
        let value = validate_form(&form(), &[Answer::new("name", "Ada")]).unwrap();
        assert_eq!(value[0]["question_text"], "Name");
        assert_eq!(value[0]["value"], "Ada");
        assert_eq!(value[0]["is_required"], true);
    }

    #[test]
    fn test_validate_form_lists_violations() {
        let (violations, count) =
            validate_form(&form(), &[Answer::new("Track", "Frontend")]).unwrap_err();

        assert_eq!(count, 2);
        assert_eq!(violations[0]["code"], "FORM_INVALID_OPTION");
        assert_eq!(violations[1]["code"], "FORM_MISSING_REQUIRED_QUESTION");
        assert_eq!(violations[1]["question_text"], "Name");
    }

    #[test]
    fn test_boot_state_seeds_admin_once() {
        let config = AppConfig::from_json(
            r#"{
                "jwt": {"secret": "test-secret"},
                "bootstrap_admin": {"email": "root@example.com", "password": "password123"}
            }"#,
        )
        .unwrap();

        let state = boot_state(&config).unwrap();
        let users = state.auth.list_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::Admin);
        assert_eq!(users[0].name, "Administrator");

        // Seeding is idempotent
        state
            .auth
            .seed_admin("Other", "root@example.com", "password123")
            .unwrap();
        assert_eq!(state.auth.list_users().unwrap().len(), 1);
    }
}
