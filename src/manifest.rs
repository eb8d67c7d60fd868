//! Manifest assembly, validation and serialization

use crate::error::{Result, ValidationError};
use crate::types::{Data, MinfyItem, PlatformMeta};
use chrono::{DateTime, Utc};

/// Check the fields a record cannot be persisted without
pub fn validate(data: &Data) -> std::result::Result<(), ValidationError> {
    let raw_url = data.raw_url.clone();
    if data.id.is_empty() {
        return Err(ValidationError::MissingId { raw_url });
    }
    if data.raw_url.is_empty() {
        return Err(ValidationError::MissingRawUrl { raw_url });
    }
    if data.author.id.is_empty() {
        return Err(ValidationError::MissingAuthorId { raw_url });
    }
    if data.author.name.is_empty() {
        return Err(ValidationError::MissingAuthorName { raw_url });
    }
    Ok(())
}

/// Validate `data` and wrap it into a [`MinfyItem`] saved now
pub fn assemble(
    data: Data,
    meta: Option<PlatformMeta>,
    extension_version: &str,
) -> std::result::Result<MinfyItem, ValidationError> {
    assemble_at(data, meta, extension_version, Utc::now())
}

/// [`assemble`] with an explicit capture time
pub fn assemble_at(
    data: Data,
    meta: Option<PlatformMeta>,
    extension_version: &str,
    saved_at: DateTime<Utc>,
) -> std::result::Result<MinfyItem, ValidationError> {
    if let Err(e) = validate(&data) {
        tracing::warn!(raw_url = %data.raw_url, error = %e, "Record rejected");
        return Err(e);
    }
    Ok(MinfyItem::new(
        extension_version.to_string(),
        saved_at,
        data,
        meta,
    ))
}

/// Pretty-printed JSON manifest
pub fn to_pretty_json(item: &MinfyItem) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(item)?)
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Source, User, XMeta};
    use chrono::TimeZone;

    fn valid_data() -> Data {
        Data {
            id: "0b4f".into(),
            source: Source::X,
            raw_url: "https://x.com/alice/status/1".into(),
            created_at: Some(Utc.with_ymd_and_hms(2025, 10, 15, 19, 0, 0).unwrap()),
            text: Some("hi".into()),
            hashtags: vec![],
            favorites_count: 0,
            author: User {
                id: "alice".into(),
                name: "Alice".into(),
                raw_url: "https://x.com/alice".into(),
                icon_url: String::new(),
                screen_name: "@alice".into(),
            },
            media: vec![],
            bookmarked: false,
        }
    }

    #[test]
    fn test_assemble_attaches_version_and_time() {
        let saved_at = Utc.with_ymd_and_hms(2025, 10, 16, 4, 0, 0).unwrap();
        let meta = PlatformMeta::X(XMeta::default());
        let item = assemble_at(valid_data(), Some(meta.clone()), "0.3.0", saved_at).unwrap();

        assert_eq!(item.extension_version(), "0.3.0");
        assert_eq!(item.saved_at(), saved_at);
        assert_eq!(item.core(), &valid_data());
        assert_eq!(item.meta(), Some(&meta));
    }

    #[test]
    fn test_each_required_field_is_checked() {
        let mut data = valid_data();
        data.id.clear();
        assert!(matches!(
            validate(&data),
            Err(ValidationError::MissingId { .. })
        ));

        let mut data = valid_data();
        data.raw_url.clear();
        assert!(matches!(
            validate(&data),
            Err(ValidationError::MissingRawUrl { .. })
        ));

        let mut data = valid_data();
        data.author.id.clear();
        assert_eq!(
            assemble(data, None, "0.3.0").unwrap_err(),
            ValidationError::MissingAuthorId {
                raw_url: "https://x.com/alice/status/1".into()
            }
        );

        let mut data = valid_data();
        data.author.name.clear();
        assert!(matches!(
            assemble(data, None, "0.3.0"),
            Err(ValidationError::MissingAuthorName { .. })
        ));
    }

    #[test]
    fn test_manifest_json_shape() {
        let saved_at = Utc.with_ymd_and_hms(2025, 10, 16, 4, 0, 0).unwrap();
        let item = assemble_at(valid_data(), None, "0.3.0", saved_at).unwrap();
        let bytes = to_pretty_json(&item).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();

        assert!(text.contains('\n'), "manifest should be pretty-printed");
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["extensionVersion"], "0.3.0");
        assert_eq!(value["savedAt"], "2025-10-16T04:00:00Z");
        assert_eq!(value["core"]["createdAt"], "2025-10-15T19:00:00Z");
        assert_eq!(value["core"]["author"]["id"], "alice");
        assert!(value.get("meta").is_none());

        let back: MinfyItem = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, item);
    }
}
