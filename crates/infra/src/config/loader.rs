//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. When `POSTBOX_BASE_URL` is set, configuration comes from the environment
//! 2. Otherwise the loader probes for a config file
//! 3. With no file found, built-in defaults apply
//!
//! ## Environment Variables
//! - `POSTBOX_BASE_URL`: Service base URL (required for the env source)
//! - `POSTBOX_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `POSTBOX_MAX_AUTH_ATTEMPTS`: Total dispatches per call under auth retry
//! - `POSTBOX_USER_AGENT`: User-Agent header value
//! - `POSTBOX_CREDENTIAL_BACKEND`: `file`, `keychain` or `memory`
//! - `POSTBOX_CREDENTIAL_PATH`: Saved credential file location
//! - `POSTBOX_PROFILE_FAILURE`: `non_fatal` or `invalidate`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./postbox.{json,toml}` then `./config.{json,toml}`
//! 2. The same names in the parent and grandparent directories
//! 3. The same names beside the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use postbox_domain::{
    ApiConfig, Config, CredentialBackend, CredentialConfig, PostboxError, ProfileFailurePolicy,
    Result, SessionConfig,
};

use crate::errors::InfraError;

pub const BASE_URL_VAR: &str = "POSTBOX_BASE_URL";
pub const TIMEOUT_VAR: &str = "POSTBOX_TIMEOUT_SECS";
pub const MAX_AUTH_ATTEMPTS_VAR: &str = "POSTBOX_MAX_AUTH_ATTEMPTS";
pub const USER_AGENT_VAR: &str = "POSTBOX_USER_AGENT";
pub const CREDENTIAL_BACKEND_VAR: &str = "POSTBOX_CREDENTIAL_BACKEND";
pub const CREDENTIAL_PATH_VAR: &str = "POSTBOX_CREDENTIAL_PATH";
pub const PROFILE_FAILURE_VAR: &str = "POSTBOX_PROFILE_FAILURE";

const FILE_NAMES: [&str; 4] = ["postbox.json", "postbox.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `PostboxError::Config` if an environment value is malformed or a
/// discovered config file cannot be parsed.
pub fn load() -> Result<Config> {
    if std::env::var_os(BASE_URL_VAR).is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::debug!("No config source found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// `POSTBOX_BASE_URL` must be set; every other variable falls back to its
/// default when absent.
///
/// # Errors
/// Returns `PostboxError::Config` if the base URL is missing or a value does
/// not parse.
pub fn load_from_env() -> Result<Config> {
    let defaults = ApiConfig::default();

    let api = ApiConfig {
        base_url: env_var(BASE_URL_VAR)?,
        timeout_secs: env_parsed(TIMEOUT_VAR)?.unwrap_or(defaults.timeout_secs),
        max_auth_attempts: env_parsed(MAX_AUTH_ATTEMPTS_VAR)?.unwrap_or(defaults.max_auth_attempts),
        user_agent: env_optional(USER_AGENT_VAR),
    };

    let credentials = CredentialConfig {
        backend: env_parsed::<CredentialBackend>(CREDENTIAL_BACKEND_VAR)?.unwrap_or_default(),
        path: env_optional(CREDENTIAL_PATH_VAR).map(PathBuf::from),
    };

    let session = SessionConfig {
        profile_failure: env_parsed::<ProfileFailurePolicy>(PROFILE_FAILURE_VAR)?
            .unwrap_or_default(),
    };

    Ok(Config { api, credentials, session })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations via
/// [`probe_config_paths`].
///
/// # Errors
/// Returns `PostboxError::Config` if the file is missing, unreadable, or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PostboxError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PostboxError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PostboxError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration text, picking the format from the file extension.
pub fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| InfraError::from(e).into()),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PostboxError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(PostboxError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }

    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        roots.push(exe_dir);
    }

    probe_in(&roots)
}

fn probe_in(roots: &[PathBuf]) -> Option<PathBuf> {
    roots
        .iter()
        .flat_map(|root| FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|candidate| candidate.is_file())
}

fn env_var(key: &str) -> Result<String> {
    env_optional(key).ok_or_else(|| {
        PostboxError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Set and non-blank, trimmed.
fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parsed<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_optional(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| PostboxError::Config(format!("Invalid {key}: {e}")))
        })
        .transpose()
}
