//! Core types for minfy-capture
//!
//! The serialized shape of these types is the manifest format read by the
//! MINFY viewer, so field names are camelCase and enums are lowercase.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Platform a record was captured from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// X (Twitter)
    #[default]
    X,
    /// Any other platform
    Other,
}

/// Kind of attached media
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Still image
    Image,
    /// Video (only the poster image is captured)
    Video,
    /// Looping animation served as an inline video source
    Gif,
    /// Audio
    Audio,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Gif => "gif",
            MediaType::Audio => "audio",
        };
        f.write_str(name)
    }
}

/// One attached media item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// Canonical source URL
    pub raw_url: String,
    /// File name relative to the record's own directory
    pub path: String,
    /// Media kind
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

/// Author of a post
///
/// Every field is empty when it could not be resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Platform user id (the handle on X)
    pub id: String,
    /// Display name
    pub name: String,
    /// Profile URL
    pub raw_url: String,
    /// Avatar URL at full size
    pub icon_url: String,
    /// `@handle`, or empty
    #[serde(default)]
    pub screen_name: String,
}

/// Platform-agnostic fields of one captured post
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    /// Record identifier (see [`IdentityPolicy`](crate::config::IdentityPolicy))
    pub id: String,
    /// Platform tag
    pub source: Source,
    /// Canonical post URL
    pub raw_url: String,
    /// Post timestamp; `None` when the page carried no parsable time (serialized as `null`)
    pub created_at: Option<DateTime<Utc>>,
    /// Reconstructed body text; `None` when the post has no text container
    pub text: Option<String>,
    /// Hashtags in document order, duplicates kept
    pub hashtags: Vec<String>,
    /// Like count
    pub favorites_count: u64,
    /// Author
    pub author: User,
    /// Attached media in document order
    pub media: Vec<Media>,
    /// Viewer bookmark state, always false at capture time
    pub bookmarked: bool,
}

/// Primitive value allowed in [`OtherMeta`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// JSON null
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// String
    Text(String),
}

/// X-specific metadata
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XMeta {
    /// Id of the record this post quotes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_tweet_id: Option<String>,
    /// Id of the record this post replies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_tweet_id: Option<String>,
}

/// Metadata for platforms without a dedicated schema
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherMeta {
    /// Extension properties, primitive values only
    #[serde(flatten)]
    pub properties: BTreeMap<String, MetaValue>,
}

/// Platform-specific metadata, tagged by `source`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum PlatformMeta {
    /// X (Twitter)
    X(XMeta),
    /// Other platforms
    Other(OtherMeta),
}

impl PlatformMeta {
    /// Empty metadata for a platform
    pub fn empty(source: Source) -> Self {
        match source {
            Source::X => PlatformMeta::X(XMeta::default()),
            Source::Other => PlatformMeta::Other(OtherMeta::default()),
        }
    }

    /// Quoted record id, if this is X metadata that carries one
    pub fn quoted_tweet_id(&self) -> Option<&str> {
        match self {
            PlatformMeta::X(meta) => meta.quoted_tweet_id.as_deref(),
            PlatformMeta::Other(_) => None,
        }
    }
}

/// Top-level persisted unit for one captured post
///
/// Built by [`manifest::assemble`](crate::manifest::assemble) or by
/// deserializing a manifest. Both run [`manifest::validate`](crate::manifest::validate),
/// so every instance holds a valid record; the fields are read-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "UncheckedItem")]
pub struct MinfyItem {
    extension_version: String,
    saved_at: DateTime<Utc>,
    core: Data,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<PlatformMeta>,
}

/// Manifest fields as read, before validation
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UncheckedItem {
    extension_version: String,
    saved_at: DateTime<Utc>,
    core: Data,
    #[serde(default)]
    meta: Option<PlatformMeta>,
}

impl TryFrom<UncheckedItem> for MinfyItem {
    type Error = ValidationError;

    fn try_from(item: UncheckedItem) -> Result<Self, Self::Error> {
        crate::manifest::validate(&item.core)?;
        Ok(Self::new(
            item.extension_version,
            item.saved_at,
            item.core,
            item.meta,
        ))
    }
}

impl MinfyItem {
    pub(crate) fn new(
        extension_version: String,
        saved_at: DateTime<Utc>,
        core: Data,
        meta: Option<PlatformMeta>,
    ) -> Self {
        Self {
            extension_version,
            saved_at,
            core,
            meta,
        }
    }

    /// Version of the capturing tool
    pub fn extension_version(&self) -> &str {
        &self.extension_version
    }

    /// Capture time
    pub fn saved_at(&self) -> DateTime<Utc> {
        self.saved_at
    }

    /// Core record
    pub fn core(&self) -> &Data {
        &self.core
    }

    /// Platform metadata
    pub fn meta(&self) -> Option<&PlatformMeta> {
        self.meta.as_ref()
    }
}

/// Event emitted while capturing and persisting
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A record passed validation
    Captured {
        /// Record id
        id: String,
        /// Canonical post URL
        raw_url: String,
    },

    /// A record failed validation and will not be persisted
    Rejected {
        /// Canonical post URL (may be empty)
        raw_url: String,
        /// Validation failure
        reason: String,
    },

    /// A media file was written
    MediaSaved {
        /// Record id
        id: String,
        /// Final path on disk
        path: PathBuf,
    },

    /// A media transfer failed (siblings continue)
    MediaFailed {
        /// Record id
        id: String,
        /// Source URL of the media
        raw_url: String,
        /// Error message
        error: String,
    },

    /// The manifest was written
    ManifestSaved {
        /// Record id
        id: String,
        /// Final path on disk
        path: PathBuf,
    },

    /// The manifest write failed
    ManifestFailed {
        /// Record id
        id: String,
        /// Error message
        error: String,
    },
}
