//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use inventory::outbound::persistence::DbPool;
use url::Url;

/// Where custody terms are posted for signature.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub(crate) endpoint: Url,
    pub(crate) timeout: Duration,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) blob_root: PathBuf,
    pub(crate) blob_public_base: Url,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) webhook: Option<WebhookConfig>,
}

impl ServerConfig {
    /// In-memory ledger, no webhook; attach collaborators with the `with_*`
    /// methods.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, blob_root: PathBuf, blob_public_base: Url) -> Self {
        Self {
            bind_addr,
            blob_root,
            blob_public_base,
            db_pool: None,
            webhook: None,
        }
    }

    /// Persist the ledger in PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Enable term dispatch through `endpoint`.
    #[must_use]
    pub fn with_webhook(mut self, endpoint: Url, timeout: Duration) -> Self {
        self.webhook = Some(WebhookConfig { endpoint, timeout });
        self
    }
}
