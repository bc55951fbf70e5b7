use std::time::Duration;

use backoff::{ExponentialBackoff, future::retry};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{Author, Entity, EntityKind, MediaKind, Post, Span};
use crate::oauth::Credentials;
use crate::permalink::PostId;

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com/1.1";

/* ---------- wire format (statuses/show) ---------- */

#[derive(Deserialize)]
struct ApiStatus {
    id_str: String,
    #[serde(alias = "full_text")]
    text: String,
    created_at: String,
    user: ApiUser,
    #[serde(default)]
    source: String,
    #[serde(default)]
    entities: ApiEntities,
    extended_entities: Option<ApiExtendedEntities>,
}

#[derive(Deserialize)]
struct ApiUser {
    screen_name: String,
    name: String,
    profile_image_url: String,
    #[serde(default)]
    profile_background_color: String,
    #[serde(default)]
    profile_link_color: String,
    #[serde(default)]
    profile_text_color: String,
    utc_offset: Option<i32>,
}

#[derive(Deserialize, Default)]
struct ApiEntities {
    #[serde(default)]
    user_mentions: Vec<ApiMention>,
    #[serde(default)]
    hashtags: Vec<ApiHashtag>,
    #[serde(default)]
    urls: Vec<ApiUrl>,
}

#[derive(Deserialize)]
struct ApiExtendedEntities {
    #[serde(default)]
    media: Vec<ApiMedia>,
}

#[derive(Deserialize)]
struct ApiMention {
    screen_name: String,
    #[serde(default)]
    indices: [usize; 2],
}

#[derive(Deserialize)]
struct ApiHashtag {
    text: String,
    #[serde(default)]
    indices: [usize; 2],
}

#[derive(Deserialize)]
struct ApiUrl {
    url: String,
    expanded_url: Option<String>,
    display_url: Option<String>,
    #[serde(default)]
    indices: [usize; 2],
}

#[derive(Deserialize)]
struct ApiMedia {
    #[serde(rename = "type")]
    kind: String,
    url: String,
    media_url: String,
    expanded_url: Option<String>,
    display_url: Option<String>,
    #[serde(default)]
    indices: [usize; 2],
}

fn span([start, end]: [usize; 2]) -> Span {
    Span { start, end }
}

/// Parse the API's `Wed Oct 10 20:19:24 +0000 2018` timestamps.
pub fn parse_created_at(s: &str) -> Result<OffsetDateTime> {
    let fmt = format_description!(
        "[weekday repr:short] [month repr:short] [day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute] [year]"
    );
    OffsetDateTime::parse(s, &fmt).map_err(|e| Error::Timestamp(format!("{s:?}: {e}")))
}

/// Decode a `statuses/show` response body into a [`Post`].
///
/// Media come from `extended_entities` only; a post without them has no
/// media entities even if `entities.media` is present.
pub fn decode_status(body: &str) -> Result<Post> {
    let status: ApiStatus = serde_json::from_str(body)?;

    let mut entities = Vec::new();
    for u in status.entities.urls {
        entities.push(Entity::new(
            span(u.indices),
            EntityKind::Link {
                url: u.url,
                expanded_url: u.expanded_url,
                display_url: u.display_url,
            },
        ));
    }
    for m in status.entities.user_mentions {
        entities.push(Entity::new(
            span(m.indices),
            EntityKind::Mention {
                screen_name: m.screen_name,
            },
        ));
    }
    for h in status.entities.hashtags {
        entities.push(Entity::new(span(h.indices), EntityKind::Hashtag { text: h.text }));
    }
    for m in status.extended_entities.map(|e| e.media).unwrap_or_default() {
        entities.push(Entity::new(
            span(m.indices),
            EntityKind::Media {
                kind: MediaKind::from_api(&m.kind),
                url: m.url,
                media_url: m.media_url,
                expanded_url: m.expanded_url,
                display_url: m.display_url,
            },
        ));
    }

    Ok(Post {
        id: PostId::from_digits(status.id_str),
        text: status.text,
        created_at: parse_created_at(&status.created_at)?,
        author: Author {
            screen_name: status.user.screen_name,
            display_name: status.user.name,
            avatar_url: status.user.profile_image_url,
            background_color: status.user.profile_background_color,
            link_color: status.user.profile_link_color,
            text_color: status.user.profile_text_color,
            utc_offset: status.user.utc_offset,
        },
        source: status.source,
        entities,
    })
}

/// Signed client for the v1.1 REST API.
pub struct TwitterClient {
    http: Client,
    base: String,
    credentials: Credentials,
    max_elapsed: Duration,
}

impl TwitterClient {
    pub fn new(http: Client, base: &str, credentials: Credentials, max_elapsed: Duration) -> Self {
        Self {
            http,
            base: base.trim_end_matches('/').to_string(),
            credentials,
            max_elapsed,
        }
    }

    /// Fetch one post. 429 and 5xx answers and transport failures are retried
    /// until `max_elapsed`; other error statuses fail at once.
    pub async fn fetch_post(&self, id: &PostId) -> Result<Post> {
        let url = format!("{}/statuses/show.json", self.base);
        let params = [
            ("id", id.as_str()),
            ("include_entities", "true"),
            ("tweet_mode", "extended"),
        ];

        let op = || async {
            let auth = self.credentials.authorization("GET", &url, &params);
            let resp = self
                .http
                .get(&url)
                .query(&params)
                .header(reqwest::header::AUTHORIZATION, auth)
                .send()
                .await
                .map_err(|e| {
                    warn!("fetch of post {id} failed: {e}");
                    backoff::Error::transient(Error::Http(e))
                })?;

            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| backoff::Error::transient(Error::Http(e)))?;

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                warn!("api returned {status} for post {id}, retrying");
                Err(backoff::Error::transient(Error::Api { status, body }))
            } else if !status.is_success() {
                Err(backoff::Error::permanent(Error::Api { status, body }))
            } else {
                debug!("api returned {} bytes for post {id}", body.len());
                decode_status(&body).map_err(backoff::Error::permanent)
            }
        };

        let post = retry(
            ExponentialBackoff {
                max_elapsed_time: Some(self.max_elapsed),
                ..Default::default()
            },
            op,
        )
        .await?;
        info!("fetched post {} by @{}", post.id, post.author.screen_name);
        Ok(post)
    }
}
