use super::{ByteSource, Storage};
use crate::config::{Config, ConflictPolicy, RetryConfig};
use crate::error::{Error, Result, StorageError};
use crate::retry::with_retry;
use crate::utils::{collision, ensure_relative, uniquify_candidates};
use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

/// Filesystem storage below a root directory
///
/// Remote sources are fetched completely before anything is written, so a
/// failed transfer leaves no partial file behind. Bytes go to a unique
/// temporary file in the target directory, which is then moved onto the
/// final name. Under [`ConflictPolicy::Uniquify`] that move refuses to
/// replace an existing file, so the first save to reach a name owns it.
#[derive(Clone, Debug)]
pub struct FsStorage {
    root: PathBuf,
    client: reqwest::Client,
    retry: RetryConfig,
}

impl FsStorage {
    /// Storage rooted at `config.storage.output_dir`
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_root(
            config.storage.output_dir.clone(),
            config.storage.fetch_timeout,
            config.retry.clone(),
        )
    }

    /// Storage rooted at an explicit directory
    pub fn with_root(root: PathBuf, fetch_timeout: Duration, retry: RetryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| {
                Error::Io(std::io::Error::other(format!(
                    "Failed to create HTTP client: {}",
                    e
                )))
            })?;

        Ok(Self {
            root,
            client,
            retry,
        })
    }

    /// Root directory all paths are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        with_retry(&self.retry, || self.fetch_once(url)).await
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// `full` relative to the root
    fn relative(&self, full: &Path) -> Result<PathBuf> {
        full.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .map_err(|_| {
                StorageError::InvalidPath {
                    path: full.to_path_buf(),
                    reason: "outside the storage root".to_string(),
                }
                .into()
            })
    }
}

/// Write `bytes` to a temporary file next to `target` and move it into place
///
/// Blocking; run it off the async runtime.
fn write_claimed(target: &Path, bytes: &[u8], policy: ConflictPolicy) -> Result<PathBuf> {
    let parent = target.parent().ok_or_else(|| StorageError::InvalidPath {
        path: target.to_path_buf(),
        reason: "no parent directory".to_string(),
    })?;
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.flush()?;

    match policy {
        ConflictPolicy::Overwrite => {
            temp.persist(target).map_err(|e| Error::Io(e.error))?;
            Ok(target.to_path_buf())
        }
        ConflictPolicy::Uniquify => {
            for candidate in uniquify_candidates(target, true)? {
                match temp.persist_noclobber(&candidate) {
                    Ok(_) => return Ok(candidate),
                    Err(e) if e.error.kind() == ErrorKind::AlreadyExists => temp = e.file,
                    Err(e) => return Err(Error::Io(e.error)),
                }
            }
            Err(collision(target))
        }
    }
}

#[async_trait]
impl Storage for FsStorage {
    async fn save(
        &self,
        source: ByteSource,
        path: &Path,
        policy: ConflictPolicy,
    ) -> Result<PathBuf> {
        ensure_relative(path)?;

        let bytes = match source {
            ByteSource::Bytes(bytes) => bytes,
            ByteSource::Remote(url) => self.fetch(&url).await?,
        };

        let full_path = self.root.join(path);
        let size = bytes.len();
        let target = tokio::task::spawn_blocking(move || write_claimed(&full_path, &bytes, policy))
            .await
            .map_err(|e| Error::Other(format!("write task failed: {}", e)))??;

        tracing::debug!(
            path = %target.display(),
            bytes = size,
            "Saved file"
        );
        self.relative(&target)
    }

    async fn claim_dir(&self, path: &Path, policy: ConflictPolicy) -> Result<PathBuf> {
        ensure_relative(path)?;
        let full_path = self.root.join(path);

        if policy == ConflictPolicy::Overwrite {
            tokio::fs::create_dir_all(&full_path).await?;
            return self.relative(&full_path);
        }

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        for candidate in uniquify_candidates(&full_path, false)? {
            match tokio::fs::create_dir(&candidate).await {
                Ok(()) => {
                    tracing::debug!(path = %candidate.display(), "Claimed directory");
                    return self.relative(&candidate);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(collision(&full_path))
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}
