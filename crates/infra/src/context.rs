//! Client context - dependency injection container

use std::sync::Arc;

use postbox_core::{ApiService, CredentialStore, HttpTransport, MessagingService, ScheduleService};
use postbox_domain::{Config, Result};
use tracing::info;

use crate::credentials::open_store;
use crate::http::HttpClient;

/// Holds the configured services for one process
pub struct PostboxContext {
    pub config: Config,
    pub api: Arc<ApiService>,
    pub messaging: MessagingService,
    pub schedule: ScheduleService,
}

impl PostboxContext {
    /// Build the reqwest transport and credential backend named by `config`.
    pub fn new(config: Config) -> Result<Self> {
        let transport: Arc<dyn HttpTransport> = Arc::new(HttpClient::from_config(&config.api)?);
        let credentials = open_store(&config.credentials)?;

        info!(
            base_url = %config.api.base_url,
            backend = %config.credentials.backend,
            "postbox context initialized"
        );
        Ok(Self::from_parts(config, transport, credentials))
    }

    /// Wire explicit adapters, e.g. a mock server transport in tests.
    pub fn from_parts(
        config: Config,
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        let api = Arc::new(ApiService::new(transport, credentials, &config));
        let messaging = MessagingService::new(api.clone());
        let schedule = ScheduleService::new(api.clone());
        Self { config, api, messaging, schedule }
    }
}
