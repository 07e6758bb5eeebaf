//! Port interfaces for credential persistence
//!
//! A store holds at most one [`SavedCredential`], keyed implicitly by the
//! current OS user. Implementations must treat unreadable or malformed
//! persisted content as absence rather than an error.

use async_trait::async_trait;
use postbox_domain::{Result, SavedCredential};

/// Trait for persisting the single saved credential
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the saved credential, `None` if missing or corrupt
    async fn load(&self) -> Result<Option<SavedCredential>>;

    /// Replace the saved credential as a whole
    async fn save(&self, credential: &SavedCredential) -> Result<()>;

    /// Delete the saved credential; succeeds when nothing is saved
    async fn delete(&self) -> Result<()>;

    /// Update only the token pair, keeping the saved email and password
    async fn save_tokens(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        let updated = self
            .load()
            .await?
            .unwrap_or_default()
            .with_tokens(access_token, refresh_token);
        self.save(&updated).await
    }
}
