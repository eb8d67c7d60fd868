//! Storage path planning
//!
//! Layout below the storage root:
//!
//! ```text
//! <author.id>/<data.id>/manifest.json
//! <author.id>/<data.id>/01.jpg
//! <author.id>/<data.id>/02.mp4
//! ```
//!
//! Paths are relative to the storage root. Whether an existing file is
//! replaced or uniquified is decided by the configured
//! [`ConflictPolicy`](crate::config::ConflictPolicy), not here.

use crate::config::StorageConfig;
use crate::error::{Result, StorageError};
use crate::types::{MediaType, MinfyItem};
use crate::utils::is_plain_component;
use std::path::{Path, PathBuf};

/// File name for the `ordinal`-th (1-based) media item
pub fn media_file_name(ordinal: usize, media_type: MediaType, storage: &StorageConfig) -> String {
    format!("{:02}.{}", ordinal, storage.extension_for(media_type))
}

/// One planned media transfer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedMedia {
    /// Source URL
    pub raw_url: String,
    /// Target path relative to the storage root
    pub path: PathBuf,
    /// Media kind
    pub media_type: MediaType,
}

/// Target paths for one record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadPlan {
    /// Record directory relative to the storage root
    pub directory: PathBuf,
    /// Media transfers in record order
    pub media: Vec<PlannedMedia>,
    /// Manifest path relative to the storage root
    pub manifest_path: PathBuf,
}

impl DownloadPlan {
    /// Media target paths in record order
    pub fn media_paths(&self) -> Vec<&PathBuf> {
        self.media.iter().map(|m| &m.path).collect()
    }

    /// Same plan with every path moved into `directory`
    ///
    /// File names are kept, so the manifest's relative media paths still
    /// resolve inside the new directory.
    pub fn relocate(mut self, directory: PathBuf) -> Self {
        let rebase = |path: &Path| match path.strip_prefix(&self.directory) {
            Ok(rest) => directory.join(rest),
            Err(_) => path.to_path_buf(),
        };
        for media in &mut self.media {
            media.path = rebase(&media.path);
        }
        self.manifest_path = rebase(&self.manifest_path);
        self.directory = directory;
        self
    }
}

/// Plan the storage paths of a validated record
///
/// Fails when the author id, record id or a media file name could escape
/// the record directory.
pub fn plan(item: &MinfyItem, storage: &StorageConfig) -> Result<DownloadPlan> {
    let core = item.core();
    for component in [&core.author.id, &core.id] {
        if !is_plain_component(component) {
            return Err(StorageError::InvalidPath {
                path: PathBuf::from(component),
                reason: "not a single path component".to_string(),
            }
            .into());
        }
    }

    let directory = PathBuf::from(&core.author.id).join(&core.id);

    let mut media = Vec::with_capacity(core.media.len());
    for item_media in &core.media {
        if !is_plain_component(&item_media.path) {
            return Err(StorageError::InvalidPath {
                path: PathBuf::from(&item_media.path),
                reason: "media path must be a file name inside the record directory"
                    .to_string(),
            }
            .into());
        }
        media.push(PlannedMedia {
            raw_url: item_media.raw_url.clone(),
            path: directory.join(&item_media.path),
            media_type: item_media.media_type,
        });
    }

    let manifest_path = directory.join(&storage.manifest_file_name);
    tracing::debug!(
        record_id = %core.id,
        directory = %directory.display(),
        media = media.len(),
        "Planned storage paths"
    );

    Ok(DownloadPlan {
        directory,
        media,
        manifest_path,
    })
}
