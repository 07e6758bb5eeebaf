//! Platform keychain credential store
//!
//! The saved credential is kept as one JSON secret under
//! [`KEYCHAIN_SERVICE`], with the OS user name as the account.

use async_trait::async_trait;
use keyring::Entry;
use postbox_core::CredentialStore;
use postbox_domain::constants::KEYCHAIN_SERVICE;
use postbox_domain::{Result, SavedCredential};
use tracing::{debug, warn};

use crate::errors::InfraError;

#[derive(Debug, Clone)]
pub struct KeychainCredentialStore {
    service: String,
    account: String,
}

impl KeychainCredentialStore {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self { service: service.into(), account: account.into() }
    }

    /// Entry for the current OS user under the default service name.
    pub fn for_current_user() -> Self {
        Self::new(KEYCHAIN_SERVICE, current_os_user())
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service, &self.account).map_err(|e| InfraError::from(e).into())
    }
}

/// OS login name, `default` when the environment does not say.
pub fn current_os_user() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| "default".to_string())
}

#[async_trait]
impl CredentialStore for KeychainCredentialStore {
    async fn load(&self) -> Result<Option<SavedCredential>> {
        let entry = self.entry()?;
        let secret = match entry.get_password() {
            Ok(secret) => secret,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(err) => return Err(InfraError::from(err).into()),
        };

        match serde_json::from_str::<SavedCredential>(&secret) {
            Ok(saved) => Ok(Some(saved)),
            Err(err) => {
                warn!(account = %self.account, error = %err, "keychain credential is corrupt; deleting it");
                self.delete().await?;
                Ok(None)
            }
        }
    }

    async fn save(&self, credential: &SavedCredential) -> Result<()> {
        let secret = serde_json::to_string(credential).map_err(InfraError::from)?;
        self.entry()?.set_password(&secret).map_err(InfraError::from)?;
        debug!(account = %self.account, "saved credential stored in keychain");
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }
}
