//! Storage collaborators
//!
//! The capture core never touches the filesystem or the network itself.
//! Persisting a record means handing each planned path and its byte source
//! to a [`Storage`] implementation:
//!
//! - [`FsStorage`] writes below a root directory and fetches remote media
//!   over HTTP with retries
//! - [`MemoryStorage`] keeps everything in memory (dry runs, tests)

mod fs;
mod memory;

pub use fs::FsStorage;
pub use memory::{MemoryStorage, Stored};

use crate::config::ConflictPolicy;
use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Where the bytes of a saved file come from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ByteSource {
    /// Fetch from this URL
    Remote(String),
    /// Write these bytes as-is
    Bytes(Vec<u8>),
}

impl ByteSource {
    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            ByteSource::Remote(url) => url.clone(),
            ByteSource::Bytes(bytes) => format!("{} bytes", bytes.len()),
        }
    }
}

/// Persists byte sources at paths relative to the storage root
///
/// Implementations decide how `policy` is applied when `path` is already
/// taken. Every returned path is relative to the storage root, whatever the
/// implementation, so paths from different stores compare equal.
///
/// # Examples
///
/// ```no_run
/// use minfy_capture::config::ConflictPolicy;
/// use minfy_capture::storage::{ByteSource, MemoryStorage, Storage};
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() -> minfy_capture::Result<()> {
/// let storage = MemoryStorage::new();
/// let written = storage
///     .save(
///         ByteSource::Bytes(b"{}".to_vec()),
///         Path::new("alice/rec-1/manifest.json"),
///         ConflictPolicy::Uniquify,
///     )
///     .await?;
/// println!("saved to {}", written.display());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Storage: Send + Sync {
    /// Save `source` at `path`, resolving an existing file per `policy`
    ///
    /// Returns the root-relative path that was written. Under
    /// [`ConflictPolicy::Uniquify`] the name is claimed atomically, so
    /// concurrent saves to one path never replace each other.
    async fn save(&self, source: ByteSource, path: &Path, policy: ConflictPolicy)
    -> Result<PathBuf>;

    /// Create the directory at `path`, resolving an existing one per `policy`
    ///
    /// Under [`ConflictPolicy::Uniquify`] a taken directory yields a fresh
    /// sibling (`name (1)`, `name (2)`, ...) that this call alone owns. Under
    /// [`ConflictPolicy::Overwrite`] an existing directory is reused. Returns
    /// the root-relative directory.
    async fn claim_dir(&self, path: &Path, policy: ConflictPolicy) -> Result<PathBuf>;

    /// Implementation name, for logs
    fn name(&self) -> &'static str;
}
