//! Current-user profile

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile returned by the current-user endpoint
///
/// Fields the client does not model are kept in `extra` rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default, alias = "userId")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Display name, falling back to "First Last", then the email.
    pub fn name(&self) -> String {
        if let Some(display) = self.display_name.as_deref().filter(|d| !d.trim().is_empty()) {
            return display.to_string();
        }
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}
