//! Storage backend trait and implementations.
//!
//! This module defines the `StorageBackend` trait, the read side of whatever
//! filesystem the bundler host builds from. The HTML entry plugin only ever
//! reads source files, so that is all a backend has to do.

mod local;
#[cfg(feature = "mock")]
mod mock;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use std::path::Path;

/// Unified interface for reading source files.
///
/// All operations are asynchronous; a content load suspends on the read and
/// resumes once the file contents are available. Loads of other identities may
/// run while one is suspended.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use htmlentry_storage::{backend::StorageBackend, error::Result};
///
/// async fn html_size(backend: &dyn StorageBackend) -> Result<usize> {
///     let path = Path::new("/project/src/index.html");
///     if backend.exists(path).await? {
///         Ok(backend.read_to_string(path).await?.len())
///     } else {
///         Ok(0)
///     }
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Name of the configured backend, used for logging only.
    fn name(&self) -> &str;

    /// Check if a file exists.
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Read file contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Read file contents as UTF-8 text.
    ///
    /// Returns [`InvalidUtf8`](crate::error::ErrorKind::InvalidUtf8) if the
    /// contents are not valid UTF-8.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// # use htmlentry_storage::{backend::StorageBackend, error::Result};
    /// # async fn example(backend: &dyn StorageBackend) -> Result<()> {
    /// let html = backend.read_to_string(Path::new("/project/src/index.html")).await?;
    /// println!("Read {} bytes of HTML", html.len());
    /// # Ok(())
    /// # }
    /// ```
    async fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read(path).await?;
        String::from_utf8(bytes).or_raise(|| ErrorKind::InvalidUtf8(path.to_path_buf()))
    }
}
