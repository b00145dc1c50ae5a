//! Application state shared across handlers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::CrmConfig;
use crate::records::{HttpRecordClient, RecordClientError};
use crate::services::{ActivitiesService, ContactsService, DealsService};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The record client is built once here and
/// injected into every service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CrmConfig,
    contacts: ContactsService<HttpRecordClient>,
    deals: DealsService<HttpRecordClient>,
    activities: ActivitiesService<HttpRecordClient>,
    shutdown: CancellationToken,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store client cannot be built from the
    /// configured credentials.
    pub fn new(config: CrmConfig) -> Result<Self, RecordClientError> {
        let client = Arc::new(HttpRecordClient::new(&config.records)?);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                contacts: ContactsService::new(Arc::clone(&client)),
                deals: DealsService::new(Arc::clone(&client)),
                activities: ActivitiesService::new(client),
                config,
                shutdown: CancellationToken::new(),
            }),
        })
    }

    /// Get a reference to the CRM configuration.
    #[must_use]
    pub fn config(&self) -> &CrmConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn contacts(&self) -> &ContactsService<HttpRecordClient> {
        &self.inner.contacts
    }

    #[must_use]
    pub fn deals(&self) -> &DealsService<HttpRecordClient> {
        &self.inner.deals
    }

    #[must_use]
    pub fn activities(&self) -> &ActivitiesService<HttpRecordClient> {
        &self.inner.activities
    }

    /// Token cancelled when the server starts shutting down.
    ///
    /// In-flight reference-list loads derive child tokens from it.
    #[must_use]
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
