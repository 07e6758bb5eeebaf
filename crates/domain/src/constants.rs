//! Client constants
//!
//! Centralized location for endpoint paths, default settings, and the fixed
//! user-facing messages the client reports.

// Service defaults
pub const DEFAULT_BASE_URL: &str = "http://forms-dev.winsor.edu";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Total dispatches allowed per call under the authorization-retry protocol
pub const DEFAULT_MAX_AUTH_ATTEMPTS: u32 = 5;

// Credential persistence
pub const DEFAULT_CREDENTIAL_FILE: &str = ".login.cred";
pub const KEYCHAIN_SERVICE: &str = "postbox.credential";

/// Remote endpoint paths, relative to the configured base URL
pub mod endpoints {
    pub const AUTH: &str = "api/auth";
    pub const RENEW: &str = "api/auth/renew";
    pub const FORGOT_PASSWORD: &str = "api/auth/forgot";
    pub const REGISTER: &str = "api/auth/register";
    pub const CURRENT_USER: &str = "api/users/self";
    pub const MESSAGES: &str = "api/messages";
    pub const INBOX: &str = "api/messages/inbox";
}

// Fixed messages
pub const MISSING_TOKEN_DETAIL: &str = "missing or expired token";
pub const ENDPOINT_UNAUTHORIZED_DETAIL: &str =
    "Current user is not authorized to access this endpoint.";
pub const NO_CREDENTIAL_DETAIL: &str = "Cannot renew a token without logging in first.";
pub const FORGOT_PASSWORD_COMPLETE: &str = "Please Check your Email for your new Password.";
