//! Author resolution
//!
//! The handle comes from a profile link in the avatar or name block, or,
//! for quoted posts that render no profile links, from the avatar marker's
//! test id (`UserAvatar-Container-<handle>`).

use super::ExtractContext;
use super::text::reconstruct;
use crate::dom::{DomNode, selectors};
use crate::types::User;

/// Author of the post rooted at `root`; empty fields when unresolved
pub fn resolve_author<E: DomNode>(root: &E, ctx: &ExtractContext) -> User {
    let avatar = root
        .select_first(selectors::USER_AVATAR)
        .or_else(|| root.select_first(selectors::AVATAR_MARKER));
    let name_block = root.select_first(selectors::USER_NAME);

    let id = [avatar.as_ref(), name_block.as_ref()]
        .into_iter()
        .flatten()
        .filter_map(|scope| scope.select_first(selectors::PROFILE_LINK))
        .filter_map(|link| link.attr("href").and_then(|href| profile_handle(href, ctx)))
        .next()
        .or_else(|| marker_handle(root))
        .unwrap_or_default();

    if id.is_empty() {
        tracing::debug!("Author handle not found");
    }

    let raw_url = if id.is_empty() {
        String::new()
    } else {
        ctx.canonical_url(&format!("/{id}"))
            .map(String::from)
            .unwrap_or_default()
    };

    let name = name_block
        .and_then(|block| block.select_first("span"))
        .map(|span| reconstruct(&span, ctx).trim().to_string())
        .unwrap_or_default();

    let icon_url = avatar
        .and_then(|scope| scope.select_first(selectors::AVATAR_IMAGE))
        .and_then(|img| img.non_empty_attr("src").map(str::to_owned))
        .and_then(|src| full_size_icon(&src, ctx))
        .unwrap_or_default();

    let screen_name = if id.is_empty() {
        String::new()
    } else {
        format!("@{id}")
    };

    User {
        id,
        name,
        raw_url,
        icon_url,
        screen_name,
    }
}

/// Last path segment of a profile link, ignoring any `/status/...` tail
fn profile_handle(href: &str, ctx: &ExtractContext) -> Option<String> {
    let url = ctx.canonical_url(href)?;
    let path = url.path();
    let profile_path = path.split("/status/").next().unwrap_or(path);
    profile_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(str::to_owned)
}

fn marker_handle<E: DomNode>(root: &E) -> Option<String> {
    root.select_all(selectors::AVATAR_MARKER)
        .into_iter()
        .filter_map(|marker| {
            marker
                .attr("data-testid")
                .and_then(|id| id.strip_prefix(selectors::AVATAR_MARKER_PREFIX))
                .filter(|handle| !handle.is_empty())
                .map(str::to_owned)
        })
        .next()
}

/// Avatar URL with the size suffix (`_normal`, `_200x200`, ...) removed
fn full_size_icon(src: &str, ctx: &ExtractContext) -> Option<String> {
    let mut url = ctx.base.join(src.trim()).ok()?;
    let path = ctx
        .icon_size_suffix
        .replace(url.path(), "$1")
        .into_owned();
    url.set_path(&path);
    Some(url.to_string())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::PostSnapshot;
    use crate::extract::test_context;

    fn author_of(markup: &str) -> User {
        let snapshot = PostSnapshot::parse(markup);
        resolve_author(&snapshot.root().unwrap(), &test_context())
    }

    #[test]
    fn test_full_author_block() {
        let user = author_of(
            r#"<article>
                <div data-testid="Tweet-User-Avatar">
                    <div data-testid="UserAvatar-Container-alice">
                        <a href="/alice" role="link">
                            <img src="https://pbs.twimg.com/profile_images/1/abc_normal.jpg">
                        </a>
                    </div>
                </div>
                <div data-testid="User-Name">
                    <a href="/alice" role="link"><span><span>Alice </span><img alt="🌸"></span></a>
                    <a href="/alice" role="link"><span>@alice</span></a>
                </div>
            </article>"#,
        );
        assert_eq!(
            user,
            User {
                id: "alice".into(),
                name: "Alice 🌸".into(),
                raw_url: "https://x.com/alice".into(),
                icon_url: "https://pbs.twimg.com/profile_images/1/abc.jpg".into(),
                screen_name: "@alice".into(),
            }
        );
    }

    #[test]
    fn test_handle_from_marker_when_no_profile_link() {
        let user = author_of(
            r#"<div role="link" tabindex="0">
                <div data-testid="UserAvatar-Container-bob">
                    <img src="https://pbs.twimg.com/profile_images/2/xyz_200x200.png">
                </div>
                <div data-testid="User-Name"><span>Bob</span><span>@bob</span></div>
            </div>"#,
        );
        assert_eq!(user.id, "bob");
        assert_eq!(user.name, "Bob");
        assert_eq!(user.raw_url, "https://x.com/bob");
        assert_eq!(user.screen_name, "@bob");
        assert_eq!(
            user.icon_url,
            "https://pbs.twimg.com/profile_images/2/xyz.png"
        );
    }

    #[test]
    fn test_status_link_in_name_block_yields_profile() {
        let user = author_of(
            r#"<article><div data-testid="User-Name">
                <span>Carol</span>
                <a href="/carol/status/5"><time datetime="2025-01-01T00:00:00Z">1h</time></a>
            </div></article>"#,
        );
        assert_eq!(user.id, "carol");
        assert_eq!(user.raw_url, "https://x.com/carol");
    }

    #[test]
    fn test_unresolved_author_is_all_empty() {
        let user = author_of("<article><p>anonymous</p></article>");
        assert_eq!(user, User::default());
    }

    #[test]
    fn test_icon_without_size_suffix_is_unchanged() {
        let ctx = test_context();
        assert_eq!(
            full_size_icon("https://pbs.twimg.com/profile_images/1/abc.jpg", &ctx).as_deref(),
            Some("https://pbs.twimg.com/profile_images/1/abc.jpg")
        );
    }
}
