//! # minfy-capture
//!
//! Capture pipeline that turns one rendered social-media post into a
//! self-contained archive record: a JSON manifest plus the post's media.
//!
//! ## Pipeline
//!
//! - **Request** - [`CaptureRequest`] snapshots the post the user targeted
//! - **Extract** - [`extract`] reads text, hashtags, likes, media and author
//!   from the snapshot, degrading to empty values instead of failing
//! - **Relate** - [`relationship`] splits a quoted post into its own record
//!   and links it from the quoting one
//! - **Identify** - [`identity`] assigns content-addressed record ids
//! - **Validate** - [`manifest`] refuses records missing required fields
//! - **Plan and persist** - [`planner`] lays out
//!   `<author>/<record>/manifest.json` and numbered media files, and the
//!   [`Archiver`] writes them through a [`Storage`] collaborator
//!
//! ## Quick Start
//!
//! ```no_run
//! use minfy_capture::{Archiver, CaptureRequest, Config, ConflictPolicy, FsStorage};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new(ConflictPolicy::Uniquify);
//!     let archiver = Archiver::new(&config, Arc::new(FsStorage::new(&config)?))?;
//!
//!     // Subscribe to events
//!     let mut events = archiver.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let markup = std::fs::read_to_string("post.html")?;
//!     if let Some(request) = CaptureRequest::from_html(&markup) {
//!         archiver.capture_and_persist(&request).await;
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Capture requests, capture and persistence orchestration
pub mod capture;
/// Configuration types
pub mod config;
/// DOM capability interface and the scraper-backed implementation
pub mod dom;
/// Error types
pub mod error;
/// Field extraction from a post root
pub mod extract;
/// Record identifier assignment
pub mod identity;
/// Manifest assembly, validation and serialization
pub mod manifest;
/// Storage path planning
pub mod planner;
/// Quoted-post detection and linking
pub mod relationship;
/// Retry logic with exponential backoff
pub mod retry;
/// Storage collaborators
pub mod storage;
/// Core record types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use capture::{
    ArchiveOutcome, Archiver, CaptureOutcome, CaptureRequest, Capturer, FailedSave, PersistReport,
};
pub use config::{Config, ConflictPolicy, ExtractConfig, IdentityPolicy, RetryConfig, StorageConfig};
pub use dom::{DomNode, PostSnapshot};
pub use error::{Error, Result, StorageError, ValidationError};
pub use identity::IdentityAssigner;
pub use planner::DownloadPlan;
pub use storage::{ByteSource, FsStorage, MemoryStorage, Storage};
pub use types::{
    Data, Event, Media, MediaType, MetaValue, MinfyItem, OtherMeta, PlatformMeta, Source, User,
    XMeta,
};
