use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use time::OffsetDateTime;

use crate::model::Post;
use crate::source_name;

pub const TIMESTAMP_FORMAT: &str = "%-I:%M %p - %-d %b %Y";

/// Caller-supplied knobs for [`bind_template`].
#[derive(Debug, Clone)]
pub struct BindOptions {
    /// Zone the timestamp is displayed in.
    pub timezone: Tz,
    /// Prepended to the avatar reference in the `<img src>`.
    pub avatar_prefix: String,
    /// Declarations inserted verbatim into the scoped `.bbpBox` rule.
    pub extra_css: String,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::London,
            avatar_prefix: "/images/".to_string(),
            extra_css: String::new(),
        }
    }
}

/// Format a post timestamp in `tz`, e.g. `3:45 PM - 2 Jan 2024`.
pub fn format_timestamp(created_at: OffsetDateTime, tz: Tz) -> String {
    DateTime::<Utc>::from_timestamp(created_at.unix_timestamp(), created_at.nanosecond())
        .unwrap_or_default()
        .with_timezone(&tz)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Fill the embed layout for `post`.
///
/// `rendered_text` is the output of [`crate::render_body`]; `avatar` is used
/// as given (a cached file name or a remote URL). The style block is keyed by
/// the post id so several embeds can share a page.
pub fn bind_template(
    post: &Post,
    rendered_text: &str,
    post_url: &str,
    avatar: &str,
    opts: &BindOptions,
) -> String {
    let id = post.id.as_str();
    let user = &post.author;
    let screen_name = &user.screen_name;
    let name = &user.display_name;
    let background = user.background_color.to_lowercase();
    let link = user.link_color.to_lowercase();
    let text_color = user.text_color.to_lowercase();
    let timestamp = format_timestamp(post.created_at, opts.timezone);
    let avatar_src = format!("{}{}", opts.avatar_prefix, avatar);

    let via = match source_name(&post.source) {
        s if s.is_empty() => String::new(),
        s => format!(" via {s}"),
    };

    let extra_css = if opts.extra_css.is_empty() {
        String::new()
    } else {
        format!("#bbpBox{id}.bbpBox {{ {} }}\n", opts.extra_css)
    };

    format!(
        r#"<!-- This comment is provided for the purposes of RSS autogen, and is stripped out in the final HTML -->
<!-- rss_tweet
<blockquote>
  <span class="twContent">{rendered_text}</span>
  <span class="twMeta"><br />
    <span class="twDecoration">&nbsp;&nbsp;&mdash; </span>
    <span class="twRealName">{name}</span>
    <span class="twDecoration"> (</span><a href="http://twitter.com/{screen_name}"><span class="twScreenName">@{screen_name}</span></a><span class="twDecoration">) </span>
    <a href="{post_url}"><span class="twTimeStamp">{timestamp}</span></a><span class="twDecoration">{via}</span>
  </span>
</blockquote>
end_rss_tweet -->

<!-- start_bbpBox -->
<style>
#bbpBox{id} {{ background: #{background}; }}
#bbpBox{id} a {{ color: #{link}; }}
#bbpBox{id} .tweet {{ color: #{text_color}; }}
#bbpBox{id} .metadata a:hover .display_name {{ color: #{link} !important; }}
{extra_css}</style>

<div id="bbpBox{id}" class="bbpBox bbpBox_new">
  <blockquote class="bbpTweet">
    <p class="metadata"><a href="https://twitter.com/{screen_name}">
        <img src="{avatar_src}" class="avatar"/>
        <span class="display_name">{name}</span>
        <span class="handle">@{screen_name}</span>
    </a></p>
    <p class="tweet">{rendered_text}</p>
    <p class="timestamp"><a href="{post_url}">{timestamp}</a></p>
  </blockquote>
</div>
<!-- end_bbpBox -->"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Author;
    use crate::permalink::parse_post_id;
    use time::macros::datetime;

    fn post(created_at: OffsetDateTime) -> Post {
        Post {
            id: parse_post_id("https://twitter.com/drdrang/status/123456").unwrap(),
            text: "hi".to_string(),
            created_at,
            author: Author {
                screen_name: "drdrang".to_string(),
                display_name: "Dr. Drang".to_string(),
                avatar_url: "http://pbs.twimg.com/profile_images/1/a_normal.jpg".to_string(),
                background_color: "1DA1F2".to_string(),
                link_color: "AbCdEf".to_string(),
                text_color: "333333".to_string(),
                utc_offset: None,
            },
            source: r#"<a href="http://twitter.com" rel="nofollow">Twitter Web Client</a>"#
                .to_string(),
            entities: vec![],
        }
    }

    #[test]
    fn converts_winter_time_to_london() {
        let ts = format_timestamp(datetime!(2024-01-02 15:45:00 UTC), chrono_tz::Europe::London);
        assert_eq!(ts, "3:45 PM - 2 Jan 2024");
    }

    #[test]
    fn converts_summer_time_to_london() {
        let ts = format_timestamp(datetime!(2018-10-10 20:19:24 UTC), chrono_tz::Europe::London);
        assert_eq!(ts, "9:19 PM - 10 Oct 2018");
    }

    #[test]
    fn honours_source_offset() {
        let ts = format_timestamp(datetime!(2024-01-02 23:30:00 -05:00), chrono_tz::UTC);
        assert_eq!(ts, "4:30 AM - 3 Jan 2024");
    }

    #[test]
    fn lowercases_colors() {
        let html = bind_template(
            &post(datetime!(2024-01-02 15:45:00 UTC)),
            "hi",
            "https://twitter.com/drdrang/status/123456",
            "twavatar_drdrang.jpeg",
            &BindOptions::default(),
        );
        assert!(html.contains("#bbpBox123456 { background: #1da1f2; }"));
        assert!(html.contains("#bbpBox123456 a { color: #abcdef; }"));
        assert!(!html.contains("1DA1F2"));
    }

    #[test]
    fn fills_layout() {
        let html = bind_template(
            &post(datetime!(2024-01-02 15:45:00 UTC)),
            "hello <a href=\"http://twitter.com/bob\">@bob</a>",
            "https://twitter.com/drdrang/status/123456",
            "twavatar_drdrang.jpeg",
            &BindOptions::default(),
        );
        assert!(html.starts_with("<!-- This comment"));
        assert!(html.ends_with("<!-- end_bbpBox -->"));
        assert!(html.contains(r#"<div id="bbpBox123456" class="bbpBox bbpBox_new">"#));
        assert!(html.contains(r#"<img src="/images/twavatar_drdrang.jpeg" class="avatar"/>"#));
        assert!(html.contains(r#"<span class="display_name">Dr. Drang</span>"#));
        assert!(html.contains(r#"<span class="handle">@drdrang</span>"#));
        assert!(html.contains(
            r#"<p class="tweet">hello <a href="http://twitter.com/bob">@bob</a></p>"#
        ));
        assert!(html.contains(
            r#"<p class="timestamp"><a href="https://twitter.com/drdrang/status/123456">3:45 PM - 2 Jan 2024</a></p>"#
        ));
        assert!(html.contains(r#"<span class="twDecoration"> via Twitter Web Client</span>"#));
        assert!(!html.contains("#bbpBox123456.bbpBox {"));
    }

    #[test]
    fn inserts_extra_css_verbatim() {
        let opts = BindOptions {
            extra_css: "max-width: 500px; border: 1px solid #ccc;".to_string(),
            avatar_prefix: "https://cdn.example.com/".to_string(),
            ..BindOptions::default()
        };
        let html = bind_template(
            &post(datetime!(2024-01-02 15:45:00 UTC)),
            "hi",
            "https://twitter.com/drdrang/status/123456",
            "a.jpeg",
            &opts,
        );
        assert!(html.contains(
            "#bbpBox123456.bbpBox { max-width: 500px; border: 1px solid #ccc; }\n</style>"
        ));
        assert!(html.contains(r#"<img src="https://cdn.example.com/a.jpeg""#));
    }

    #[test]
    fn output_is_deterministic() {
        let p = post(datetime!(2024-01-02 15:45:00 UTC));
        let opts = BindOptions::default();
        let a = bind_template(&p, "x", "u", "a", &opts);
        let b = bind_template(&p, "x", "u", "a", &opts);
        assert_eq!(a, b);
    }
}
