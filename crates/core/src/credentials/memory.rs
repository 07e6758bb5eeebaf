//! Process-local credential store

use async_trait::async_trait;
use parking_lot::Mutex;
use postbox_domain::{Result, SavedCredential};

use super::ports::CredentialStore;

/// Credential store that lives only as long as the process
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    slot: Mutex<Option<SavedCredential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `credential`
    pub fn with_credential(credential: SavedCredential) -> Self {
        Self { slot: Mutex::new(Some(credential)) }
    }

    /// Current contents without going through the async port
    pub fn snapshot(&self) -> Option<SavedCredential> {
        self.slot.lock().clone()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> Result<Option<SavedCredential>> {
        Ok(self.slot.lock().clone())
    }

    async fn save(&self, credential: &SavedCredential) -> Result<()> {
        *self.slot.lock() = Some(credential.clone());
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        self.slot.lock().take();
        Ok(())
    }
}
