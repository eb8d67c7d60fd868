//! Capture orchestration
//!
//! A capture runs in two stages:
//!
//! 1. [`Capturer::capture`] turns a [`CaptureRequest`] into validated
//!    [`MinfyItem`]s (the targeted post first, then the post it quotes).
//!    This is pure and synchronous.
//! 2. [`Archiver::persist`] plans the storage paths of one item and hands
//!    every media transfer and the manifest to a [`Storage`] collaborator
//!    concurrently. A failing transfer is logged and reported without
//!    cancelling its siblings.
//!
//! # Example
//!
//! ```no_run
//! use minfy_capture::{Archiver, CaptureRequest, Config, ConflictPolicy, FsStorage};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> minfy_capture::Result<()> {
//! let config = Config::new(ConflictPolicy::Uniquify);
//! let storage = Arc::new(FsStorage::new(&config)?);
//! let archiver = Archiver::new(&config, storage)?;
//!
//! let markup = std::fs::read_to_string("post.html")?;
//! if let Some(request) = CaptureRequest::from_html(&markup) {
//!     let archived = archiver.capture_and_persist(&request).await;
//!     for report in &archived.reports {
//!         println!("{}: complete={}", report.id, report.is_complete());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use crate::config::{Config, ConflictPolicy, StorageConfig};
use crate::dom::{DomNode, PostSnapshot, selectors};
use crate::error::{Result, ValidationError};
use crate::extract::ExtractContext;
use crate::identity::IdentityAssigner;
use crate::manifest;
use crate::planner;
use crate::relationship;
use crate::storage::{ByteSource, Storage};
use crate::types::{Event, MinfyItem};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use scraper::ElementRef;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Nearest post root at or above `element`
fn post_root_of<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element
        .closest(selectors::POST_ROOT)
        .or_else(|| element.closest(selectors::POST_ROOT_FALLBACK))
}

/// One capture, scoped to the post the user targeted
///
/// Holds its own snapshot of the post root, so nothing is shared between
/// requests and the page may change after the request was built.
#[derive(Clone, Debug)]
pub struct CaptureRequest {
    snapshot: PostSnapshot,
}

impl CaptureRequest {
    /// Request for the post containing `target`
    ///
    /// Returns `None` when `target` is not inside a post.
    pub fn from_target(target: ElementRef<'_>) -> Option<Self> {
        let Some(root) = post_root_of(target) else {
            tracing::debug!(tag = target.tag_name(), "Target is not inside a post");
            return None;
        };
        Some(Self {
            snapshot: PostSnapshot::from_element(root),
        })
    }

    /// Request for the first post in serialized markup
    pub fn from_html(markup: &str) -> Option<Self> {
        let parsed = PostSnapshot::parse(markup);
        let first = parsed.root()?;
        let root = post_root_of(first).or_else(|| {
            first
                .select_first(selectors::POST_ROOT)
                .or_else(|| first.select_first(selectors::POST_ROOT_FALLBACK))
        })?;
        Some(Self {
            snapshot: PostSnapshot::from_element(root),
        })
    }

    /// The snapshot extraction runs against
    pub fn snapshot(&self) -> &PostSnapshot {
        &self.snapshot
    }
}

/// Result of one capture
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaptureOutcome {
    /// Accepted records, targeted post first
    pub items: Vec<MinfyItem>,
    /// Records refused by validation
    pub rejections: Vec<ValidationError>,
}

/// Extraction, identity and validation for capture requests
#[derive(Clone, Debug)]
pub struct Capturer {
    ctx: ExtractContext,
    identity: IdentityAssigner,
    extension_version: String,
}

impl Capturer {
    /// Capturer for a validated `config`
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ctx: ExtractContext::new(config)?,
            identity: IdentityAssigner::new(config.identity_policy),
            extension_version: config.extension_version.clone(),
        })
    }

    /// Capture the requested post, saved now
    pub fn capture(&self, request: &CaptureRequest) -> CaptureOutcome {
        self.capture_at(request, Utc::now())
    }

    /// Capture with an explicit save time
    ///
    /// With a content-addressed identity policy, two calls on the same
    /// snapshot with the same `saved_at` produce equal outcomes.
    pub fn capture_at(&self, request: &CaptureRequest, saved_at: DateTime<Utc>) -> CaptureOutcome {
        let resolution = relationship::resolve(request.snapshot(), &self.ctx, &self.identity);

        let mut outcome = CaptureOutcome::default();
        for record in std::iter::once(resolution.primary).chain(resolution.quoted) {
            match manifest::assemble_at(record.data, record.meta, &self.extension_version, saved_at)
            {
                Ok(item) => outcome.items.push(item),
                Err(e) => outcome.rejections.push(e),
            }
        }
        outcome
    }
}

/// A save that did not complete
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedSave {
    /// Planned path relative to the storage root
    pub path: PathBuf,
    /// Media source URL, `None` for the manifest
    pub raw_url: Option<String>,
    /// Error message
    pub error: String,
}

/// What persisting one record achieved
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistReport {
    /// Record id
    pub id: String,
    /// Record directory actually used, relative to the storage root
    pub directory: PathBuf,
    /// Media files written, in record order of the successful ones
    pub saved: Vec<PathBuf>,
    /// Manifest path written, `None` if the write failed
    pub manifest: Option<PathBuf>,
    /// Media and manifest saves that failed
    pub failed: Vec<FailedSave>,
}

impl PersistReport {
    /// Every media file and the manifest were written
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.manifest.is_some()
    }
}

/// Result of [`Archiver::capture_and_persist`]
#[derive(Clone, Debug, Default)]
pub struct ArchiveOutcome {
    /// One report per accepted record, in capture order
    pub reports: Vec<PersistReport>,
    /// Records refused by validation
    pub rejections: Vec<ValidationError>,
    /// Accepted records that got no record directory (unplannable paths or a
    /// failed directory creation), with the reason
    pub unplanned: Vec<(String, String)>,
}

/// Capture plus persistence through a [`Storage`] collaborator
///
/// Progress is published as [`Event`]s; see [`subscribe`](Self::subscribe).
pub struct Archiver {
    capturer: Capturer,
    storage: Arc<dyn Storage>,
    storage_config: StorageConfig,
    event_tx: broadcast::Sender<Event>,
}

impl Archiver {
    /// Archiver writing through `storage`
    pub fn new(config: &Config, storage: Arc<dyn Storage>) -> Result<Self> {
        let (event_tx, _rx) = broadcast::channel(1000);
        tracing::debug!(storage = storage.name(), "Archiver ready");
        Ok(Self {
            capturer: Capturer::new(config)?,
            storage,
            storage_config: config.storage.clone(),
            event_tx,
        })
    }

    /// Subscribe to capture and persistence events
    ///
    /// Receivers only see events sent after they subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Conflict policy applied to every save
    pub fn conflict_policy(&self) -> ConflictPolicy {
        self.storage_config.conflict_policy
    }

    fn emit_event(&self, event: Event) {
        // send() returns Err if there are no receivers, which is fine - we just drop the event
        self.event_tx.send(event).ok();
    }

    /// Capture the requested post and announce the outcome
    pub fn capture(&self, request: &CaptureRequest) -> CaptureOutcome {
        let outcome = self.capturer.capture(request);
        for item in &outcome.items {
            tracing::info!(id = %item.core().id, raw_url = %item.core().raw_url, "Captured post");
            self.emit_event(Event::Captured {
                id: item.core().id.clone(),
                raw_url: item.core().raw_url.clone(),
            });
        }
        for rejection in &outcome.rejections {
            self.emit_event(Event::Rejected {
                raw_url: rejection.raw_url().to_string(),
                reason: rejection.to_string(),
            });
        }
        outcome
    }

    /// Save the media and manifest of one accepted record
    ///
    /// Under [`ConflictPolicy::Uniquify`] a recapture gets its own record
    /// directory (`<id> (1)`, ...) instead of renamed files beside the
    /// earlier ones. Fails only when no storage path can be planned, the
    /// record directory cannot be created, or the manifest cannot be
    /// serialized; transfer failures are collected in the report.
    pub async fn persist(&self, item: &MinfyItem) -> Result<PersistReport> {
        let plan = planner::plan(item, &self.storage_config)?;
        let manifest_bytes = manifest::to_pretty_json(item)?;
        let id = item.core().id.clone();
        let policy = self.storage_config.conflict_policy;

        // the record moves as a whole, so the manifest's media paths keep
        // pointing at files written by this capture
        let directory = self.storage.claim_dir(&plan.directory, policy).await?;
        let plan = plan.relocate(directory);

        let media_saves = plan.media.iter().map(|media| async move {
            let result = self
                .storage
                .save(ByteSource::Remote(media.raw_url.clone()), &media.path, policy)
                .await;
            (media, result)
        });
        let manifest_save =
            self.storage
                .save(ByteSource::Bytes(manifest_bytes), &plan.manifest_path, policy);

        let (media_results, manifest_result) = tokio::join!(join_all(media_saves), manifest_save);

        let mut report = PersistReport {
            id: id.clone(),
            directory: plan.directory.clone(),
            saved: Vec::new(),
            manifest: None,
            failed: Vec::new(),
        };

        for (media, result) in media_results {
            match result {
                Ok(path) => {
                    self.emit_event(Event::MediaSaved {
                        id: id.clone(),
                        path: path.clone(),
                    });
                    report.saved.push(path);
                }
                Err(e) => {
                    tracing::warn!(
                        id = %id,
                        raw_url = %media.raw_url,
                        path = %media.path.display(),
                        error = %e,
                        "Media transfer failed"
                    );
                    self.emit_event(Event::MediaFailed {
                        id: id.clone(),
                        raw_url: media.raw_url.clone(),
                        error: e.to_string(),
                    });
                    report.failed.push(FailedSave {
                        path: media.path.clone(),
                        raw_url: Some(media.raw_url.clone()),
                        error: e.to_string(),
                    });
                }
            }
        }

        match manifest_result {
            Ok(path) => {
                self.emit_event(Event::ManifestSaved {
                    id: id.clone(),
                    path: path.clone(),
                });
                report.manifest = Some(path);
            }
            Err(e) => {
                tracing::error!(
                    id = %id,
                    path = %plan.manifest_path.display(),
                    error = %e,
                    "Manifest write failed"
                );
                self.emit_event(Event::ManifestFailed {
                    id: id.clone(),
                    error: e.to_string(),
                });
                report.failed.push(FailedSave {
                    path: plan.manifest_path.clone(),
                    raw_url: None,
                    error: e.to_string(),
                });
            }
        }

        tracing::info!(
            id = %id,
            saved = report.saved.len(),
            failed = report.failed.len(),
            "Persisted record"
        );
        Ok(report)
    }

    /// Capture the requested post and persist every accepted record
    pub async fn capture_and_persist(&self, request: &CaptureRequest) -> ArchiveOutcome {
        let CaptureOutcome { items, rejections } = self.capture(request);

        let mut outcome = ArchiveOutcome {
            rejections,
            ..ArchiveOutcome::default()
        };
        for item in &items {
            match self.persist(item).await {
                Ok(report) => outcome.reports.push(report),
                Err(e) => {
                    tracing::warn!(id = %item.core().id, error = %e, "Record not persisted");
                    outcome.unplanned.push((item.core().id.clone(), e.to_string()));
                }
            }
        }
        outcome
    }
}
