//! Attached media enumeration and classification
//!
//! | Container holds                     | Type    | rawUrl                          |
//! |-------------------------------------|---------|---------------------------------|
//! | `img[draggable=true]`               | image   | `src` without sizing parameters |
//! | `video` with empty `src`            | video   | `poster` (body is not fetched)  |
//! | `video` with non-empty `src`        | gif     | `src`                           |
//!
//! Containers matching none of these are skipped.

use super::ExtractContext;
use crate::dom::{DomNode, selectors};
use crate::planner::media_file_name;
use crate::types::{Media, MediaType};

/// Attached media of `root` in document order
///
/// `path` is filled with the file name the download planner will use.
pub fn classify_media<E: DomNode>(root: &E, ctx: &ExtractContext) -> Vec<Media> {
    let mut media = Vec::new();
    for container in root.select_all(selectors::MEDIA_CONTAINER) {
        let Some((media_type, raw_url)) = classify_container(&container, ctx) else {
            tracing::debug!("Media container without usable image or video, skipped");
            continue;
        };
        let path = media_file_name(media.len() + 1, media_type, &ctx.storage);
        media.push(Media {
            raw_url,
            path,
            media_type,
        });
    }
    media
}

fn classify_container<E: DomNode>(
    container: &E,
    ctx: &ExtractContext,
) -> Option<(MediaType, String)> {
    if let Some(src) = container
        .select_first(selectors::DRAGGABLE_IMAGE)
        .and_then(|img| img.non_empty_attr("src").map(str::to_owned))
    {
        return canonical_image_url(&src, ctx).map(|url| (MediaType::Image, url));
    }

    // video sources are taken verbatim; the page already renders them absolute
    let video = container.select_first(selectors::VIDEO)?;
    match video.non_empty_attr("src") {
        Some(src) => Some((MediaType::Gif, src.to_string())),
        None => {
            let poster = video.non_empty_attr("poster")?;
            Some((MediaType::Video, poster.to_string()))
        }
    }
}

/// Image URL with rendition-size parameters removed
///
/// Other query parameters (`format=jpg`) are kept in order. With
/// `request_original_size`, `name=orig` is appended.
pub fn canonical_image_url(src: &str, ctx: &ExtractContext) -> Option<String> {
    let mut url = ctx.base.join(src.trim()).ok()?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !ctx.sizing_params.iter().any(|p| p == key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.set_query(None);
    if !kept.is_empty() || ctx.request_original_size {
        let mut pairs = url.query_pairs_mut();
        pairs.extend_pairs(kept);
        if ctx.request_original_size {
            pairs.append_pair("name", "orig");
        }
    }
    Some(url.to_string())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ConflictPolicy};
    use crate::dom::PostSnapshot;
    use crate::extract::test_context;

    fn media_of(markup: &str) -> Vec<Media> {
        let snapshot = PostSnapshot::parse(markup);
        classify_media(&snapshot.root().unwrap(), &test_context())
    }

    #[test]
    fn test_draggable_image_strips_sizing_param() {
        let media = media_of(
            r#"<article><div data-testid="tweetPhoto">
                <img draggable="true" src="https://pbs.twimg.com/media/AbC?format=jpg&amp;name=small">
            </div></article>"#,
        );
        assert_eq!(media.len(), 1);
        assert_eq!(media[0].media_type, MediaType::Image);
        assert_eq!(media[0].raw_url, "https://pbs.twimg.com/media/AbC?format=jpg");
        assert_eq!(media[0].path, "01.jpg");
    }

    #[test]
    fn test_sizing_param_first_in_query() {
        let media = media_of(
            r#"<article><div data-testid="tweetPhoto">
                <img draggable="true" src="https://pbs.twimg.com/media/AbC?name=900x900">
            </div></article>"#,
        );
        assert_eq!(media[0].raw_url, "https://pbs.twimg.com/media/AbC");
    }

    #[test]
    fn test_original_size_hint_is_optional() {
        let mut config = Config::new(ConflictPolicy::Uniquify);
        config.extract.request_original_size = true;
        let ctx = ExtractContext::new(&config).unwrap();

        assert_eq!(
            canonical_image_url("https://pbs.twimg.com/media/AbC?format=png&name=small", &ctx)
                .as_deref(),
            Some("https://pbs.twimg.com/media/AbC?format=png&name=orig")
        );
    }

    #[test]
    fn test_video_without_inline_source_uses_poster() {
        let media = media_of(
            r#"<article><div data-testid="tweetPhoto">
                <div data-testid="videoPlayer"><video poster="P" src=""></video></div>
            </div></article>"#,
        );
        assert_eq!(media.len(), 1);
        assert_eq!(media[0].media_type, MediaType::Video);
        assert_eq!(media[0].raw_url, "P");
        assert_eq!(media[0].path, "01.mp4");
    }

    #[test]
    fn test_video_poster_absolute_url_is_kept() {
        let media = media_of(
            r#"<article><div data-testid="tweetPhoto">
                <video poster="https://pbs.twimg.com/ext_tw_video_thumb/1/pu/img/P.jpg"></video>
            </div></article>"#,
        );
        assert_eq!(
            media[0].raw_url,
            "https://pbs.twimg.com/ext_tw_video_thumb/1/pu/img/P.jpg"
        );
    }

    #[test]
    fn test_video_with_inline_source_is_gif() {
        let media = media_of(
            r#"<article><div data-testid="tweetPhoto">
                <video poster="P" src="S"></video>
            </div></article>"#,
        );
        assert_eq!(media[0].media_type, MediaType::Gif);
        assert_eq!(media[0].raw_url, "S");
    }

    #[test]
    fn test_unmatched_containers_are_skipped_and_ordinals_stay_dense() {
        let media = media_of(
            r#"<article>
                <div data-testid="tweetPhoto"><img src="https://pbs.twimg.com/media/notdraggable.jpg"></div>
                <div data-testid="tweetPhoto"><img draggable="true" src="https://pbs.twimg.com/media/A?name=small"></div>
                <div data-testid="tweetPhoto"><video></video></div>
                <div data-testid="tweetPhoto"><video src="https://video.twimg.com/tweet_video/G.mp4"></video></div>
            </article>"#,
        );
        let summary: Vec<(MediaType, &str)> = media
            .iter()
            .map(|m| (m.media_type, m.path.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![(MediaType::Image, "01.jpg"), (MediaType::Gif, "02.mp4")]
        );
    }
}
