//! Authentication types
//!
//! Wire records exchanged with the auth endpoints, the in-memory [`Session`],
//! and the locally persisted [`SavedCredential`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::serde::lenient_datetime;

/// Login request body, also used by forgot-password and register
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

impl Login {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Login").field("email", &self.email).field("password", &"<redacted>").finish()
    }
}

/// Response to a successful login or renewal
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "userId", default)]
    pub user_id: String,
    /// JWT used for authentication
    pub jwt: String,
    /// Refresh token used for renewing the JWT
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: String,
    /// When the JWT expires
    #[serde(with = "lenient_datetime", default = "unix_epoch")]
    pub expires: DateTime<Utc>,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("user_id", &self.user_id)
            .field("expires", &self.expires)
            .finish_non_exhaustive()
    }
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// The currently authenticated identity
///
/// Replaced wholesale on renewal; fields are never updated in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires: DateTime<Utc>,
}

impl Session {
    /// Session seeded from a saved token pair on cold start, before the
    /// service has confirmed who it belongs to.
    pub fn provisional(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            user_id: String::new(),
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires: unix_epoch(),
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.user_id.is_empty()
    }

    /// Informational only; expiry is discovered from 401 responses.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Self {
            user_id: response.user_id,
            access_token: response.jwt,
            refresh_token: response.refresh_token,
            expires: response.expires,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("expires", &self.expires)
            .finish_non_exhaustive()
    }
}

/// Locally persisted mirror of the login inputs and last-known tokens
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCredential {
    #[serde(rename = "SavedEmail", default)]
    pub email: String,
    #[serde(rename = "SavedPassword", default)]
    pub password: String,
    #[serde(rename = "Jwt", default)]
    pub last_access_token: String,
    #[serde(rename = "RefreshToken", default)]
    pub last_refresh_token: String,
}

impl SavedCredential {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        last_access_token: impl Into<String>,
        last_refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            last_access_token: last_access_token.into(),
            last_refresh_token: last_refresh_token.into(),
        }
    }

    /// A password usable for the renewal fallback login.
    pub fn has_password(&self) -> bool {
        !self.password.trim().is_empty()
    }

    pub fn has_token_pair(&self) -> bool {
        !self.last_access_token.is_empty() && !self.last_refresh_token.is_empty()
    }

    /// Same identity with a replacement token pair.
    #[must_use]
    pub fn with_tokens(self, access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            last_access_token: access_token.into(),
            last_refresh_token: refresh_token.into(),
            ..self
        }
    }
}

impl fmt::Debug for SavedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavedCredential")
            .field("email", &self.email)
            .field("has_password", &self.has_password())
            .field("has_token_pair", &self.has_token_pair())
            .finish()
    }
}
