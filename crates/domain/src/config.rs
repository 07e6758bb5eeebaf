//! Configuration structures
//!
//! Every section carries serde defaults so partial JSON/TOML files and
//! environment overlays only need to name what they change.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BASE_URL, DEFAULT_MAX_AUTH_ATTEMPTS, DEFAULT_TIMEOUT_SECS};
use crate::impl_enum_str_conversions;

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub credentials: CredentialConfig,
    pub session: SessionConfig,
}

/// Remote service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is resolved against
    pub base_url: String,
    /// Transport-level timeout per request
    pub timeout_secs: u64,
    /// Total dispatches per call under the authorization-retry protocol
    pub max_auth_attempts: u32,
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_auth_attempts: DEFAULT_MAX_AUTH_ATTEMPTS,
            user_agent: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry bound with the initial dispatch always allowed.
    pub fn auth_attempt_bound(&self) -> u32 {
        self.max_auth_attempts.max(1)
    }
}

/// Where the saved credential lives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialBackend {
    /// JSON file in the user's home directory
    #[default]
    File,
    /// Platform keychain entry
    Keychain,
    /// Process-local only; nothing survives a restart
    Memory,
}

impl_enum_str_conversions!(CredentialBackend {
    File => "file",
    Keychain => "keychain",
    Memory => "memory",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    pub backend: CredentialBackend,
    /// Overrides the per-user default file location (file backend only)
    pub path: Option<PathBuf>,
}

/// What a failed profile fetch does to a login that otherwise succeeded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileFailurePolicy {
    /// Keep the session; report the profile error
    #[default]
    NonFatal,
    /// Clear the new session and fail the login
    Invalidate,
}

impl_enum_str_conversions!(ProfileFailurePolicy {
    NonFatal => "non_fatal",
    Invalidate => "invalidate",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub profile_failure: ProfileFailurePolicy,
}
