//! Port for storing signed contract files.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by blob storage adapters.
    pub enum BlobStorageError {
        /// The path escapes the bucket or is otherwise unusable.
        InvalidPath { path: String } => "invalid blob path: {path}",
        /// Reading or writing the blob failed.
        Io { message: String } => "blob storage failed: {message}",
        /// No blob exists at the path.
        NotFound { path: String } => "blob not found: {path}",
    }
}

/// Object storage addressed by relative paths such as
/// `contracts/{employee}/{file}.pdf`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Store `bytes` at `path` and return the public URL of the blob.
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, BlobStorageError>;

    /// Remove the blob at `path`.
    async fn remove(&self, path: &str) -> Result<(), BlobStorageError>;

    /// Public URL under which `path` is served.
    fn public_url(&self, path: &str) -> String;
}
