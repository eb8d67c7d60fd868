use super::{ByteSource, Storage};
use crate::config::ConflictPolicy;
use crate::error::{Error, Result};
use crate::utils::{collision, ensure_relative, resolve_conflict, uniquify_candidates};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// What a [`MemoryStorage`] holds for one path
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stored {
    /// Bytes written directly
    Bytes(Vec<u8>),
    /// A remote source, recorded but not fetched
    Remote(String),
}

/// In-memory storage that never touches disk or network
///
/// A directory counts as taken once it was claimed or holds a saved file.
/// Remote sources are recorded by URL. URLs passed to
/// [`refuse`](Self::refuse) fail as if the host were unreachable.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<BTreeMap<PathBuf, Stored>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
    refused: Mutex<HashSet<String>>,
}

impl MemoryStorage {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later save of `url` fail
    pub async fn refuse(&self, url: impl Into<String>) {
        self.refused.lock().await.insert(url.into());
    }

    /// Snapshot of everything saved so far, ordered by path
    pub async fn files(&self) -> BTreeMap<PathBuf, Stored> {
        self.files.lock().await.clone()
    }

    /// Content saved at `path`
    pub async fn get(&self, path: impl AsRef<Path>) -> Option<Stored> {
        self.files.lock().await.get(path.as_ref()).cloned()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn save(
        &self,
        source: ByteSource,
        path: &Path,
        policy: ConflictPolicy,
    ) -> Result<PathBuf> {
        ensure_relative(path)?;

        let stored = match source {
            ByteSource::Bytes(bytes) => Stored::Bytes(bytes),
            ByteSource::Remote(url) => {
                if self.refused.lock().await.contains(&url) {
                    return Err(Error::Other(format!("source refused: {url}")));
                }
                Stored::Remote(url)
            }
        };

        let mut files = self.files.lock().await;
        let target = resolve_conflict(path, policy, |p| files.contains_key(p))?;
        files.insert(target.clone(), stored);
        Ok(target)
    }

    async fn claim_dir(&self, path: &Path, policy: ConflictPolicy) -> Result<PathBuf> {
        ensure_relative(path)?;

        let files = self.files.lock().await;
        let mut dirs = self.dirs.lock().await;
        let target = match policy {
            ConflictPolicy::Overwrite => path.to_path_buf(),
            ConflictPolicy::Uniquify => uniquify_candidates(path, false)?
                .find(|candidate| {
                    !dirs.contains(candidate) && !files.keys().any(|f| f.starts_with(candidate))
                })
                .ok_or_else(|| collision(path))?,
        };
        dirs.insert(target.clone());
        Ok(target)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
