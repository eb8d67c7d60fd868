//! Scalar fields of a post: permalink, timestamp, text, hashtags, like count

use super::ExtractContext;
use super::text::extract_text;
use crate::dom::{DomNode, selectors};
use chrono::{DateTime, Utc};

/// Scalar fields pulled from a post root
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BasicInfo {
    /// Canonical post URL, empty when no status link was found
    pub raw_url: String,
    /// Post time, `None` when missing or unparsable
    pub created_at: Option<DateTime<Utc>>,
    /// Body text, `None` when there is no text container
    pub text: Option<String>,
    /// Hashtags in document order
    pub hashtags: Vec<String>,
    /// Like count, 0 when the like control is absent
    pub favorites_count: u64,
}

/// Extract all scalar fields of `root`
pub fn extract_basic_info<E: DomNode>(root: &E, ctx: &ExtractContext) -> BasicInfo {
    BasicInfo {
        raw_url: extract_raw_url(root, ctx),
        created_at: extract_created_at(root),
        text: extract_text(root, ctx),
        hashtags: extract_hashtags(root),
        favorites_count: extract_favorites_count(root, ctx),
    }
}

/// Canonical post URL
///
/// Prefers the link wrapping the timestamp (the permalink); otherwise takes
/// the first link into a status page and drops trailing segments like
/// `/photo/1`. Quoted posts usually only have the latter.
pub fn extract_raw_url<E: DomNode>(root: &E, ctx: &ExtractContext) -> String {
    let permalink = root
        .select_all(selectors::TIME)
        .into_iter()
        .find_map(|time| time.closest("a[href]"))
        .and_then(|link| link.attr("href").map(str::to_owned));

    if let Some(href) = permalink {
        let canonical = ctx
            .canonical_status_url(&href)
            .or_else(|| ctx.canonical_url(&href).map(String::from));
        if let Some(url) = canonical {
            return url;
        }
    }

    let fallback = root
        .select_all(selectors::STATUS_LINK)
        .into_iter()
        .filter_map(|link| link.attr("href").map(str::to_owned))
        .find_map(|href| ctx.canonical_status_url(&href));

    fallback.unwrap_or_else(|| {
        tracing::debug!("No status link found, rawUrl left empty");
        String::new()
    })
}

/// Post time from the first `time[datetime]`
pub fn extract_created_at<E: DomNode>(root: &E) -> Option<DateTime<Utc>> {
    let raw = root
        .select_first(selectors::TIME)
        .and_then(|time| time.attr("datetime").map(str::to_owned))?;

    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(datetime = %raw, error = %e, "Unparsable post time");
            None
        }
    }
}

/// Text of every hashtag link, verbatim and in document order
pub fn extract_hashtags<E: DomNode>(root: &E) -> Vec<String> {
    root.select_all(selectors::HASHTAG_LINK)
        .into_iter()
        .map(|link| link.text_content())
        .collect()
}

/// Like count from the like control's accessible label
pub fn extract_favorites_count<E: DomNode>(root: &E, ctx: &ExtractContext) -> u64 {
    let Some(control) = root.select_first(selectors::LIKE_CONTROL) else {
        return 0;
    };
    let Some(label) = control.attr("aria-label") else {
        tracing::debug!("Like control has no accessible label");
        return 0;
    };
    parse_like_label(label, ctx).unwrap_or_else(|| {
        tracing::debug!(label, "Like label did not match the configured pattern");
        0
    })
}

fn parse_like_label(label: &str, ctx: &ExtractContext) -> Option<u64> {
    let captures = ctx.like_count.captures(label)?;
    let digits = captures.get(1)?.as_str();
    let digits = if ctx.group_separator.is_empty() {
        digits.to_string()
    } else {
        digits.replace(ctx.group_separator.as_str(), "")
    };
    digits.parse().ok()
}
