//! Environment-variable configuration loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::app_config::{AppConfig, Environment};

/// Errors produced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the actual environment so
/// tests can drive it with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("NEWSCOPE_ENV", "development"));
    let log_level = or_default("NEWSCOPE_LOG_LEVEL", "info");

    let naver_client_id = optional("NEWSCOPE_NAVER_CLIENT_ID");
    let naver_client_secret = optional("NEWSCOPE_NAVER_CLIENT_SECRET");
    let google_api_key = optional("NEWSCOPE_GOOGLE_API_KEY");
    let google_cse_cx = optional("NEWSCOPE_GOOGLE_CSE_CX");

    let webdriver_url = or_default("NEWSCOPE_WEBDRIVER_URL", "http://localhost:4444");
    let http_timeout_secs = parse_u64("NEWSCOPE_HTTP_TIMEOUT_SECS", "30")?;
    let element_wait_secs = parse_u64("NEWSCOPE_ELEMENT_WAIT_SECS", "20")?;
    let user_agent = or_default("NEWSCOPE_USER_AGENT", "newscope/0.1 (news-intelligence)");
    let export_dir = PathBuf::from(or_default("NEWSCOPE_EXPORT_DIR", "./data"));

    Ok(AppConfig {
        env,
        log_level,
        naver_client_id,
        naver_client_secret,
        google_api_key,
        google_cse_cx,
        webdriver_url,
        http_timeout_secs,
        element_wait_secs,
        user_agent,
        export_dir,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
