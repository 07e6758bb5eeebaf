//! Credential store backends

pub mod file;
pub mod keychain;

use std::sync::Arc;

pub use file::FileCredentialStore;
pub use keychain::KeychainCredentialStore;
pub use postbox_core::credentials::InMemoryCredentialStore;
use postbox_core::CredentialStore;
use postbox_domain::{CredentialBackend, CredentialConfig, Result};
use tracing::debug;

/// Open the backend named by the configuration.
pub fn open_store(config: &CredentialConfig) -> Result<Arc<dyn CredentialStore>> {
    debug!(backend = %config.backend, "opening credential store");
    let store: Arc<dyn CredentialStore> = match config.backend {
        CredentialBackend::File => match &config.path {
            Some(path) => Arc::new(FileCredentialStore::new(path)),
            None => Arc::new(FileCredentialStore::at_default_location()?),
        },
        CredentialBackend::Keychain => Arc::new(KeychainCredentialStore::for_current_user()),
        CredentialBackend::Memory => Arc::new(InMemoryCredentialStore::new()),
    };
    Ok(store)
}
