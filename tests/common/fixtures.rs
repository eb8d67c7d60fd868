//! Rendered post fixtures
//!
//! Trimmed copies of the markup x.com renders for a post, keeping only the
//! structure extraction looks at.

/// Canonical URL of [`SIMPLE_POST`]
pub const SIMPLE_POST_URL: &str = "https://x.com/alice/status/1846000000000000001";

/// Post with text, a hashtag, one image, one video, one gif and a like count
pub const SIMPLE_POST: &str = r##"<article data-testid="tweet" role="article" tabindex="0">
  <div data-testid="Tweet-User-Avatar">
    <a href="/alice" role="link"><img alt="" src="https://pbs.twimg.com/profile_images/111/alice_normal.jpg"></a>
  </div>
  <div data-testid="User-Name">
    <a href="/alice" role="link"><span>Alice <img alt="🌸" src="https://abs-0.twimg.com/emoji/v2/svg/1f338.svg"></span></a>
    <a href="/alice" role="link"><span>@alice</span></a>
    <a href="/alice/status/1846000000000000001?s=20"><time datetime="2025-10-15T10:00:00.000Z">Oct 15</time></a>
  </div>
  <div data-testid="tweetText" lang="en"><span>a </span><a href="http://t.co/x">t.co/x</a><span> b</span><img alt="😊" src="https://abs-0.twimg.com/emoji/v2/svg/1f60a.svg"> <a href="/hashtag/minfy?src=hashtag_click">#minfy</a></div>
  <div data-testid="tweetPhoto">
    <a href="/alice/status/1846000000000000001/photo/1"><img alt="Image" draggable="true" src="https://pbs.twimg.com/media/GZabc?format=jpg&amp;name=small"></a>
  </div>
  <div data-testid="tweetPhoto">
    <video preload="none" poster="P"></video>
  </div>
  <div data-testid="tweetPhoto">
    <video preload="auto" src="S"></video>
  </div>
  <div role="group">
    <button data-testid="reply" aria-label="5 Replies. Reply"></button>
    <button data-testid="like" aria-label="1,234 Likes. Like"></button>
  </div>
</article>"##;

/// Same post as [`SIMPLE_POST`] reached through a differently decorated link
pub const SIMPLE_POST_VARIANT: &str = r##"<article data-testid="tweet" role="article">
  <div data-testid="Tweet-User-Avatar"><a href="/alice"><img src="https://pbs.twimg.com/profile_images/111/alice_bigger.jpg"></a></div>
  <div data-testid="User-Name">
    <a href="/alice"><span>Alice</span></a>
    <a href="https://x.com/alice/status/1846000000000000001/analytics?ref=share#top"><time datetime="2025-10-15T10:00:00Z">Oct 15</time></a>
  </div>
  <div data-testid="tweetText">edited rendering</div>
  <button data-testid="unlike" aria-label="1,235 Likes. Liked"></button>
</article>"##;

/// Canonical URL of the quoting post in [`QUOTING_POST`]
pub const QUOTING_POST_URL: &str = "https://x.com/alice/status/200";

/// Canonical URL of the quoted post in [`QUOTING_POST`]
pub const QUOTED_POST_URL: &str = "https://x.com/bob/status/150";

/// Post quoting another post that carries its own media and hashtag
pub const QUOTING_POST: &str = r##"<article data-testid="tweet" role="article">
  <div data-testid="Tweet-User-Avatar"><a href="/alice"><img src="https://pbs.twimg.com/profile_images/111/alice_normal.jpg"></a></div>
  <div data-testid="User-Name">
    <a href="/alice"><span>Alice</span></a>
    <a href="/alice/status/200"><time datetime="2025-10-15T12:00:00.000Z">Oct 15</time></a>
  </div>
  <div data-testid="tweetText">worth reading <a href="/hashtag/outer">#outer</a></div>
  <div role="link" tabindex="0">
    <div data-testid="UserAvatar-Container-bob"><img src="https://pbs.twimg.com/profile_images/222/bob_normal.png"></div>
    <div data-testid="User-Name">
      <span>Bob</span><span>@bob</span>
      <time datetime="2025-10-14T08:30:00.000Z">Oct 14</time>
    </div>
    <div data-testid="tweetText">original <a href="/hashtag/inner">#inner</a></div>
    <div data-testid="tweetPhoto">
      <a href="/bob/status/150/photo/1"><img draggable="true" src="https://pbs.twimg.com/media/Bqt?format=png&amp;name=360x360"></a>
    </div>
  </div>
  <button data-testid="like" aria-label="42 Likes. Like"></button>
</article>"##;

/// Post whose author block is missing entirely
pub const AUTHORLESS_POST: &str = r##"<article data-testid="tweet" role="article">
  <a href="/someone/status/300"><time datetime="2025-10-15T12:00:00.000Z">Oct 15</time></a>
  <div data-testid="tweetText">who wrote this?</div>
</article>"##;

/// Post with no like control rendered
pub const NO_LIKE_CONTROL_POST: &str = r##"<article data-testid="tweet" role="article">
  <div data-testid="Tweet-User-Avatar"><a href="/carol"><img src="https://pbs.twimg.com/profile_images/333/carol_normal.jpg"></a></div>
  <div data-testid="User-Name"><a href="/carol"><span>Carol</span></a>
    <a href="/carol/status/400"><time datetime="2025-10-15T12:00:00.000Z">Oct 15</time></a></div>
</article>"##;

/// A full page with a timeline around [`SIMPLE_POST`]
pub fn timeline_page() -> String {
    format!(
        r#"<!DOCTYPE html><html><body><main><nav><a id="home" href="/home">Home</a></nav>
        <section aria-label="Timeline">{SIMPLE_POST}</section></main></body></html>"#
    )
}
