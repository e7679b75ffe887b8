//! In-memory storage backend for testing.

use crate::StorageBackend;
use crate::error::{ErrorKind, Result};
use crate::path::normalize;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

struct MockFile {
    data: Vec<u8>,
    reads: AtomicUsize,
}
impl MockFile {
    fn new(data: Vec<u8>) -> Self {
        Self { data, reads: AtomicUsize::new(0) }
    }
}

/// In-memory storage backend for testing.
///
/// Files are stored in a `HashMap` behind a [`RwLock`], so all methods can
/// operate on `&self` without external synchronisation. Every successful
/// [`read`](StorageBackend::read) is counted per path, which lets tests assert
/// that a cached entry was served without touching the file again.
///
/// Reads yield to the runtime once before returning, so concurrent loads
/// genuinely interleave.
///
/// # Examples
///
/// ```
/// use htmlentry_storage::backend::{MockBackend, StorageBackend};
/// use std::path::Path;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MockBackend::with_files([
///     ("/src/index.html", "<html></html>"),
/// ]);
/// assert!(backend.exists(Path::new("/src/index.html")).await?);
/// backend.read(Path::new("/src/index.html")).await?;
/// assert_eq!(backend.reads(Path::new("/src/index.html")).await, 1);
/// # Ok(())
/// # }
/// ```
pub struct MockBackend {
    name: String,
    storage: RwLock<HashMap<PathBuf, MockFile>>,
}

impl MockBackend {
    /// Seeds the backend with source files, keyed by their normalized path.
    ///
    /// Panics on a path that does not normalize, such as one climbing above
    /// the root.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        let mut map = HashMap::new();
        for (path, data) in files {
            let path = path.into();
            match normalize(&path) {
                Ok(normalized) => map.insert(normalized, MockFile::new(data.into())),
                Err(_) => panic!("MockBackend::with_files: invalid path {}", path.display()),
            };
        }
        Self {
            name: "mock".to_string(),
            storage: RwLock::new(map),
        }
    }

    /// Name reported by [`StorageBackend::name`], `"mock"` unless changed.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Create or overwrite a file, resetting its read counter.
    pub async fn write(&self, path: impl AsRef<Path>, data: impl Into<Vec<u8>>) -> Result<()> {
        let path = normalize(path)?;
        self.storage.write().await.insert(path, MockFile::new(data.into()));
        Ok(())
    }

    /// Delete a file.
    pub async fn remove(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = normalize(path)?;
        match self.storage.write().await.remove(&path) {
            Some(_) => Ok(()),
            None => exn::bail!(ErrorKind::NotFound(path)),
        }
    }

    /// Number of successful reads of `path` since it was last written.
    pub async fn reads(&self, path: impl AsRef<Path>) -> usize {
        let Ok(path) = normalize(path) else {
            return 0;
        };
        self.storage.read().await.get(&path).map_or(0, |file| file.reads.load(Ordering::SeqCst))
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let files: [(&str, &str); 0] = [];
        Self::with_files(files)
    }
}

#[async_trait]
impl StorageBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        let path = normalize(path)?;
        Ok(self.storage.read().await.contains_key(&path))
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let path = normalize(path)?;
        tokio::task::yield_now().await;
        let guard = self.storage.read().await;
        let Some(file) = guard.get(&path) else {
            exn::bail!(ErrorKind::NotFound(path));
        };
        file.reads.fetch_add(1, Ordering::SeqCst);
        Ok(file.data.clone())
    }
}
