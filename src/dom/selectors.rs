//! Structural selectors for posts rendered by x.com
//!
//! These track the live page markup and are the first thing to update when
//! the site changes.

/// Post root
pub const POST_ROOT: &str = r#"article[data-testid="tweet"]"#;

/// Post root on layouts without test ids
pub const POST_ROOT_FALLBACK: &str = r#"article[role="article"]"#;

/// Machine-readable timestamp
pub const TIME: &str = "time[datetime]";

/// Any link into a status page
pub const STATUS_LINK: &str = r#"a[href*="/status/"]"#;

/// Body text container
pub const TEXT_CONTAINER: &str = r#"[data-testid="tweetText"]"#;

/// Hashtag links
pub const HASHTAG_LINK: &str = r#"a[href^="/hashtag/"], a[href*="x.com/hashtag/"], a[href*="twitter.com/hashtag/"]"#;

/// Like or unlike button (whichever state the viewer is in)
pub const LIKE_CONTROL: &str = r#"[data-testid="like"], [data-testid="unlike"]"#;

/// One attached media container
pub const MEDIA_CONTAINER: &str = r#"[data-testid="tweetPhoto"]"#;

/// Full-size image inside a media container
pub const DRAGGABLE_IMAGE: &str = r#"img[draggable="true"]"#;

/// Video element inside a media container
pub const VIDEO: &str = "video";

/// Avatar block of the author
pub const USER_AVATAR: &str = r#"[data-testid="Tweet-User-Avatar"]"#;

/// Avatar marker whose test id embeds the handle
pub const AVATAR_MARKER: &str = r#"[data-testid^="UserAvatar-Container-"]"#;

/// Prefix of [`AVATAR_MARKER`]'s test id
pub const AVATAR_MARKER_PREFIX: &str = "UserAvatar-Container-";

/// Name and handle block of the author
pub const USER_NAME: &str = r#"[data-testid="User-Name"]"#;

/// Profile links (relative)
pub const PROFILE_LINK: &str = r#"a[href^="/"]"#;

/// Avatar image
pub const AVATAR_IMAGE: &str = "img[src]";

/// Embedded quoted post
pub const QUOTED_CONTAINER: &str = r#"div[role="link"][tabindex="0"]"#;
