//! JSON file credential store
//!
//! The file holds one [`SavedCredential`] object. Anything that does not
//! parse as one is deleted on load and reported as absent.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use postbox_core::CredentialStore;
use postbox_domain::constants::DEFAULT_CREDENTIAL_FILE;
use postbox_domain::{PostboxError, Result, SavedCredential};
use tracing::{debug, warn};

use crate::errors::InfraError;

#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.login.cred` for the current OS user.
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_CREDENTIAL_FILE))
            .ok_or_else(|| PostboxError::Config("cannot determine the home directory".into()))
    }

    pub fn at_default_location() -> Result<Self> {
        Self::default_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn remove(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }
}

fn parse_saved(contents: &str) -> Option<SavedCredential> {
    let trimmed = contents.trim();
    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<SavedCredential>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) if err.kind() == ErrorKind::InvalidData => String::new(),
            Err(err) => return Err(InfraError::from(err).into()),
        };

        match parse_saved(&contents) {
            Some(saved) => Ok(Some(saved)),
            None => {
                warn!(path = %self.path.display(), "saved credential is corrupt; deleting it");
                self.remove().await?;
                Ok(None)
            }
        }
    }

    async fn save(&self, credential: &SavedCredential) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(InfraError::from)?;
        }

        let contents = serde_json::to_string_pretty(credential).map_err(InfraError::from)?;
        tokio::fs::write(&self.path, contents).await.map_err(InfraError::from)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&self.path, permissions).await.map_err(InfraError::from)?;
        }

        debug!(path = %self.path.display(), "saved credential written");
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        self.remove().await
    }
}
