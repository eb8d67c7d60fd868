//! Extraction of a draft record from a post root
//!
//! Each submodule pulls one group of fields and never fails: absent or
//! malformed structure degrades to an empty value and a `debug!` line.
//! [`extract_data`] combines them into a [`Data`] with an empty id; the id
//! is assigned afterwards by [`identity`](crate::identity).

pub mod author;
pub mod fields;
pub mod media;
pub mod text;

use crate::config::{Config, StorageConfig};
use crate::dom::DomNode;
use crate::error::{Error, Result};
use crate::types::{Data, Source, User};
use regex::Regex;
use url::Url;

pub use author::resolve_author;
pub use fields::{BasicInfo, extract_basic_info};
pub use media::classify_media;
pub use text::reconstruct;

/// Compiled extraction settings shared by all extractors
#[derive(Clone, Debug)]
pub struct ExtractContext {
    pub(crate) base: Url,
    pub(crate) source: Source,
    pub(crate) like_count: Regex,
    pub(crate) group_separator: String,
    pub(crate) sizing_params: Vec<String>,
    pub(crate) request_original_size: bool,
    pub(crate) status_path: Regex,
    pub(crate) icon_size_suffix: Regex,
    pub(crate) storage: StorageConfig,
}

impl ExtractContext {
    /// Compile the extraction settings of `config`
    pub fn new(config: &Config) -> Result<Self> {
        let extract = &config.extract;
        Ok(Self {
            base: extract.base()?,
            source: extract.source,
            like_count: extract.like_count_regex()?,
            group_separator: extract.group_separator.clone(),
            sizing_params: extract.sizing_params.clone(),
            request_original_size: extract.request_original_size,
            status_path: compile(r"^/[^/]+/status/\d+")?,
            icon_size_suffix: compile(
                r"_(?:normal|bigger|mini|reasonably_small|x96|\d+x\d+)(\.[A-Za-z0-9]+)$",
            )?,
            storage: config.storage.clone(),
        })
    }

    /// Absolute form of `href` with query and fragment removed
    pub(crate) fn canonical_url(&self, href: &str) -> Option<Url> {
        let mut url = self.base.join(href.trim()).ok()?;
        url.set_query(None);
        url.set_fragment(None);
        Some(url)
    }

    /// Canonical `<base>/<user>/status/<id>` URL for any link into a status page
    ///
    /// Trailing segments such as `/photo/1` or `/analytics` are dropped.
    pub(crate) fn canonical_status_url(&self, href: &str) -> Option<String> {
        let mut url = self.canonical_url(href)?;
        let status_path = self.status_path.find(url.path())?.as_str().to_string();
        url.set_path(&status_path);
        Some(url.to_string())
    }

    /// Absolute form of `href`, query kept
    pub(crate) fn absolute_url(&self, href: &str) -> Option<String> {
        self.base.join(href.trim()).ok().map(String::from)
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Other(format!("invalid built-in pattern: {e}")))
}

/// A record with every field at its default
pub(crate) fn empty_data(source: Source) -> Data {
    Data {
        id: String::new(),
        source,
        raw_url: String::new(),
        created_at: None,
        text: None,
        hashtags: Vec::new(),
        favorites_count: 0,
        author: User::default(),
        media: Vec::new(),
        bookmarked: false,
    }
}

/// Draft record for one post root (id left empty)
pub fn extract_data<E: DomNode>(root: &E, ctx: &ExtractContext) -> Data {
    let BasicInfo {
        raw_url,
        created_at,
        text,
        hashtags,
        favorites_count,
    } = extract_basic_info(root, ctx);

    Data {
        id: String::new(),
        source: ctx.source,
        raw_url,
        created_at,
        text,
        hashtags,
        favorites_count,
        author: resolve_author(root, ctx),
        media: classify_media(root, ctx),
        bookmarked: false,
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
pub(crate) fn test_context() -> ExtractContext {
    ExtractContext::new(&Config::new(crate::config::ConflictPolicy::Uniquify)).unwrap()
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::PostSnapshot;

    #[test]
    fn test_canonical_status_url_strips_trailing_segments() {
        let ctx = test_context();
        assert_eq!(
            ctx.canonical_status_url("/alice/status/123/photo/1").as_deref(),
            Some("https://x.com/alice/status/123")
        );
        assert_eq!(
            ctx.canonical_status_url("https://x.com/alice/status/123/analytics?s=20#top")
                .as_deref(),
            Some("https://x.com/alice/status/123")
        );
        assert_eq!(ctx.canonical_status_url("/alice"), None);
    }

    #[test]
    fn test_absolute_url_keeps_query() {
        let ctx = test_context();
        assert_eq!(
            ctx.absolute_url("/hashtag/rust?src=hashtag_click").as_deref(),
            Some("https://x.com/hashtag/rust?src=hashtag_click")
        );
        assert_eq!(
            ctx.absolute_url("https://t.co/x").as_deref(),
            Some("https://t.co/x")
        );
    }

    #[test]
    fn test_extract_data_on_empty_root_uses_defaults() {
        let snapshot = PostSnapshot::parse(r#"<article data-testid="tweet"></article>"#);
        let data = extract_data(&snapshot.root().unwrap(), &test_context());
        assert_eq!(data, empty_data(Source::X));
    }
}
