//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! building a working context from it.

use postbox_domain::{CredentialBackend, PostboxError, ProfileFailurePolicy};
use postbox_infra::{config, PostboxContext};
use tempfile::TempDir;

#[test]
fn test_load_config_from_json_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("postbox.json");
    std::fs::write(
        &path,
        r#"{
            "api": {
                "base_url": "https://postbox.example.test",
                "timeout_secs": 10,
                "max_auth_attempts": 3,
                "user_agent": "postbox-integration"
            },
            "credentials": { "backend": "memory" },
            "session": { "profile_failure": "invalidate" }
        }"#,
    )
    .expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("Failed to load config from JSON file");

    assert_eq!(config.api.base_url, "https://postbox.example.test");
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.api.max_auth_attempts, 3);
    assert_eq!(config.api.user_agent.as_deref(), Some("postbox-integration"));
    assert_eq!(config.credentials.backend, CredentialBackend::Memory);
    assert_eq!(config.session.profile_failure, ProfileFailurePolicy::Invalidate);
}

#[test]
fn test_load_config_from_toml_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let cred_path = dir.path().join("creds").join("login.cred");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        format!(
            "[api]\nbase_url = \"https://toml.example.test\"\n\n[credentials]\nbackend = \"file\"\npath = {:?}\n",
            cred_path.display().to_string()
        ),
    )
    .expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("Failed to load config from TOML file");

    assert_eq!(config.api.base_url, "https://toml.example.test");
    assert_eq!(config.api.max_auth_attempts, 5);
    assert_eq!(config.credentials.backend, CredentialBackend::File);
    assert_eq!(config.credentials.path.as_deref(), Some(cred_path.as_path()));
}

#[test]
fn test_empty_file_yields_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("postbox.toml");
    std::fs::write(&path, "").expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("Empty TOML should load");

    assert_eq!(config, postbox_domain::Config::default());
}

#[test]
fn test_invalid_toml_is_config_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("postbox.toml");
    std::fs::write(&path, "[api\nbase_url = 3").expect("Failed to write config");

    match config::load_from_file(Some(path)) {
        Err(PostboxError::Config(msg)) => assert!(msg.contains("TOML")),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_context_builds_from_loaded_config() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("postbox.json");
    std::fs::write(
        &path,
        r#"{ "api": { "base_url": "http://127.0.0.1:9" }, "credentials": { "backend": "memory" } }"#,
    )
    .expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("Failed to load config");
    let context = PostboxContext::new(config).expect("context should build");

    assert_eq!(context.config.credentials.backend, CredentialBackend::Memory);
    assert!(context.api.authorized_user().await.is_none());
}

#[test]
fn test_invalid_base_url_fails_context() {
    let mut config = postbox_domain::Config::default();
    config.api.base_url = "::not a url::".to_string();

    assert!(matches!(PostboxContext::new(config), Err(PostboxError::Config(_))));
}
