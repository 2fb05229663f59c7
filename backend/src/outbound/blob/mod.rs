//! Filesystem-backed blob storage for contract files.
//!
//! Blobs live under a root directory opened once through `cap_std`, so a
//! path can never escape it. Writes go to a hidden temporary file that is
//! renamed into place. File I/O runs on the blocking pool.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::domain::ports::{BlobStorage, BlobStorageError};

/// Blob storage rooted at a local directory and served from `public_base`.
#[derive(Clone)]
pub struct LocalBlobStorage {
    root: Arc<Dir>,
    public_base: Url,
}

impl LocalBlobStorage {
    /// Open (creating if needed) `root` and serve blobs below `public_base`.
    ///
    /// # Errors
    /// Returns `BlobStorageError::Io` when the directory cannot be opened.
    pub fn open(root: impl AsRef<Path>, public_base: Url) -> Result<Self, BlobStorageError> {
        let root = root.as_ref();
        Dir::create_ambient_dir_all(root, ambient_authority())
            .map_err(|err| BlobStorageError::io(format!("{}: {err}", root.display())))?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(|err| BlobStorageError::io(format!("{}: {err}", root.display())))?;
        Ok(Self {
            root: Arc::new(dir),
            public_base: with_trailing_slash(public_base),
        })
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Accept only plain relative paths made of normal components.
fn relative_path(path: &str) -> Result<PathBuf, BlobStorageError> {
    let candidate = Path::new(path);
    let valid = !path.is_empty()
        && candidate
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if valid {
        Ok(candidate.to_path_buf())
    } else {
        Err(BlobStorageError::invalid_path(path))
    }
}

async fn blocking<T, F>(work: F) -> Result<T, BlobStorageError>
where
    F: FnOnce() -> Result<T, BlobStorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| BlobStorageError::io(format!("blob task failed: {err}")))?
}

fn write_atomically(dir: &Dir, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        dir.create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staged = path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()));
    dir.write(&staged, bytes)?;
    dir.rename(&staged, dir, path).inspect_err(|_| {
        let _cleanup = dir.remove_file(&staged);
    })
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, BlobStorageError> {
        let relative = relative_path(path)?;
        let dir = Arc::clone(&self.root);
        let owned = bytes.to_vec();
        blocking(move || {
            write_atomically(&dir, &relative, &owned)
                .map_err(|err| BlobStorageError::io(format!("{}: {err}", relative.display())))
        })
        .await?;
        debug!(path, content_type, size = bytes.len(), "blob stored");
        Ok(self.public_url(path))
    }

    async fn remove(&self, path: &str) -> Result<(), BlobStorageError> {
        let relative = relative_path(path)?;
        let dir = Arc::clone(&self.root);
        let owned = path.to_owned();
        blocking(move || match dir.remove_file(&relative) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobStorageError::not_found(owned))
            }
            Err(err) => Err(BlobStorageError::io(format!("{owned}: {err}"))),
        })
        .await
    }

    fn public_url(&self, path: &str) -> String {
        self.public_base
            .join(path.trim_start_matches('/'))
            .map_or_else(|_| format!("{}{path}", self.public_base), String::from)
    }
}
