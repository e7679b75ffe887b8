//! Local filesystem storage backend.
//!
//! Files are read with `tokio::fs` for async I/O. Absolute paths are read as
//! given; relative paths are resolved against the configured root directory.

use crate::error::ErrorKind;
use crate::{StorageBackend, error::Result, path::normalize};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::instrument;

/// Local filesystem storage backend.
///
/// # Examples
///
/// ```no_run
/// use htmlentry_storage::backend::LocalBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = LocalBackend::new("local", "/path/to/project")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct LocalBackend {
    name: String,
    /// Directory that relative paths are resolved against.
    root: PathBuf,
}
impl LocalBackend {
    /// Create a new local filesystem backend.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not absolute, or exists but is not a
    /// directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        if root.exists() && !root.is_dir() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        Ok(Self { name: name.into(), root })
    }

    /// Create a backend rooted at the process' current working directory.
    pub fn current_dir(name: impl Into<String>) -> Result<Self> {
        let root = std::env::current_dir().map_err(ErrorKind::Io)?;
        Self::new(name, root)
    }

    /// Get the absolute path for a (possibly relative) storage path.
    fn absolute_path(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let normalized = normalize(path.as_ref())?;
        match normalized.is_absolute() {
            true => Ok(normalized),
            false => Ok(self.root.join(normalized)),
        }
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        let abs_path = self.absolute_path(path)?;
        Ok(fs::try_exists(&abs_path).await.map_err(ErrorKind::Io)?)
    }

    #[instrument(skip(self), fields(backend = %self.name))]
    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let abs_path = self.absolute_path(path)?;
        let data = fs::read(&abs_path).await.map_err(|e| Self::map_io_error(e, path))?;
        tracing::trace!(bytes = data.len(), "read source file");
        Ok(data)
    }
}
