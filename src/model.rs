use time::OffsetDateTime;

use crate::permalink::PostId;

/// One fetched post. Built once from the API response and consumed by a
/// single render.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub text: String,
    pub created_at: OffsetDateTime,
    pub author: Author,
    /// Client the post was sent from, as the API delivers it (usually an
    /// HTML anchor).
    pub source: String,
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub screen_name: String,
    pub display_name: String,
    pub avatar_url: String,
    pub background_color: String,
    pub link_color: String,
    pub text_color: String,
    /// Seconds east of UTC, when the account exposes one.
    pub utc_offset: Option<i32>,
}

/// Offsets of an entity inside the body text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub span: Span,
    pub kind: EntityKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Mention {
        screen_name: String,
    },
    /// Tag text without the leading `#`.
    Hashtag {
        text: String,
    },
    Link {
        /// Short URL exactly as it appears in the body.
        url: String,
        expanded_url: Option<String>,
        display_url: Option<String>,
    },
    Media {
        kind: MediaKind,
        /// Marker URL exactly as it appears in the body.
        url: String,
        media_url: String,
        expanded_url: Option<String>,
        display_url: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Other(String),
}

impl MediaKind {
    pub fn from_api(kind: &str) -> Self {
        match kind {
            "photo" => Self::Photo,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Entity {
    pub fn new(span: Span, kind: EntityKind) -> Self {
        Self { span, kind }
    }

    pub fn mention(screen_name: impl Into<String>) -> Self {
        Self::new(
            Span::default(),
            EntityKind::Mention {
                screen_name: screen_name.into(),
            },
        )
    }

    pub fn hashtag(text: impl Into<String>) -> Self {
        Self::new(Span::default(), EntityKind::Hashtag { text: text.into() })
    }

    pub fn link(
        url: impl Into<String>,
        expanded_url: Option<&str>,
        display_url: Option<&str>,
    ) -> Self {
        Self::new(
            Span::default(),
            EntityKind::Link {
                url: url.into(),
                expanded_url: expanded_url.map(str::to_string),
                display_url: display_url.map(str::to_string),
            },
        )
    }

    pub fn photo(url: impl Into<String>, media_url: impl Into<String>) -> Self {
        Self::new(
            Span::default(),
            EntityKind::Media {
                kind: MediaKind::Photo,
                url: url.into(),
                media_url: media_url.into(),
                expanded_url: None,
                display_url: None,
            },
        )
    }
}
