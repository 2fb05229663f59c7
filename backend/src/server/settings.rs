//! Process settings loaded via OrthoConfig.
//!
//! Every field can come from the command line, a config file or an
//! `INVENTORY_*` environment variable.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_BLOB_ROOT: &str = "data/blobs";
const DEFAULT_BLOB_PUBLIC_BASE_URL: &str = "http://localhost:8080/files/";
const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// Invalid setting values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("INVENTORY_BIND_ADDR {value:?} is not a socket address: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("{name} {value:?} is not a valid URL: {source}")]
    Url {
        name: &'static str,
        value: String,
        source: url::ParseError,
    },
}

/// Configuration values controlling the ledger server.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "INVENTORY")]
pub struct InventorySettings {
    /// PostgreSQL URL; the ledger stays in memory when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub database_max_connections: Option<u32>,
    /// Socket the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// Signature webhook receiving custody terms.
    pub webhook_url: Option<String>,
    pub webhook_timeout_secs: Option<u64>,
    /// Directory holding uploaded contract files.
    pub blob_root: Option<PathBuf>,
    /// Public URL prefix under which `blob_root` is served.
    pub blob_public_base_url: Option<String>,
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::Url {
        name,
        value: value.to_owned(),
        source,
    })
}

impl InventorySettings {
    /// Database URL with blank values treated as absent.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.trim().parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Webhook endpoint, or `None` when term dispatch is not configured.
    pub fn webhook_url(&self) -> Result<Option<Url>, SettingsError> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| parse_url("INVENTORY_WEBHOOK_URL", url))
            .transpose()
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(
            self.webhook_timeout_secs
                .unwrap_or(DEFAULT_WEBHOOK_TIMEOUT_SECS),
        )
    }

    pub fn blob_root(&self) -> PathBuf {
        self.blob_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BLOB_ROOT))
    }

    pub fn blob_public_base_url(&self) -> Result<Url, SettingsError> {
        let value = self
            .blob_public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_BLOB_PUBLIC_BASE_URL);
        parse_url("INVENTORY_BLOB_PUBLIC_BASE_URL", value)
    }
}
