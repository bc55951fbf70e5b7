use regex::{NoExpand, RegexBuilder};
use tracing::warn;

use crate::model::{Entity, EntityKind, MediaKind};

const PROFILE_BASE: &str = "http://twitter.com/";
const HASHTAG_SEARCH_BASE: &str = "http://twitter.com/search/%23";

/// Render `text` with its entities substituted in and newlines turned into
/// `<br />`. Never fails: missing optional fields fall back to the short URL.
///
/// Substitution is literal and global: every occurrence of a short URL,
/// `@handle` or `#tag` is replaced, not just the span the entity points at.
/// Links go first so later passes never see the raw short URLs again; media
/// go last so their fragment is untouched by the mention and hashtag passes.
pub fn render_body(text: &str, entities: &[Entity]) -> String {
    let mut out = text.to_string();

    for entity in entities {
        if let EntityKind::Link {
            url,
            expanded_url,
            display_url,
        } = &entity.kind
        {
            out = out.replace(
                url,
                &link_anchor(url, expanded_url.as_deref(), display_url.as_deref()),
            );
        }
    }

    for entity in entities {
        if let EntityKind::Mention { screen_name } = &entity.kind {
            let anchor = format!("<a href=\"{PROFILE_BASE}{screen_name}\">@{screen_name}</a>");
            out = replace_ignore_case(&out, &format!("@{screen_name}"), &anchor);
        }
    }

    for entity in entities {
        if let EntityKind::Hashtag { text } = &entity.kind {
            let anchor = format!("<a href=\"{HASHTAG_SEARCH_BASE}{text}\">#{text}</a>");
            out = replace_ignore_case(&out, &format!("#{text}"), &anchor);
        }
    }

    out = embed_media(out, entities);

    out.replace('\n', "<br />")
}

fn link_anchor(url: &str, expanded_url: Option<&str>, display_url: Option<&str>) -> String {
    match (expanded_url, display_url) {
        (Some(href), Some(label)) => format!("<a href=\"{href}\">{label}</a>"),
        _ => format!("<a href=\"{url}\">{url}</a>"),
    }
}

/// Case-insensitive literal replace of every `needle` in `haystack`.
fn replace_ignore_case(haystack: &str, needle: &str, replacement: &str) -> String {
    match RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace_all(haystack, NoExpand(replacement)).into_owned(),
        Err(e) => {
            // Only reachable if the escaped pattern exceeds the regex size limit.
            warn!("skipping entity {needle:?}: {e}");
            haystack.to_string()
        }
    }
}

/// All media items usually share one trailing marker URL in the body, so the
/// combined fragment replaces the marker of the last item only.
fn embed_media(text: String, entities: &[Entity]) -> String {
    let mut fragment = String::new();
    let mut marker = None;

    for entity in entities {
        let EntityKind::Media {
            kind,
            url,
            media_url,
            expanded_url,
            display_url,
        } = &entity.kind
        else {
            continue;
        };

        match kind {
            MediaKind::Photo => fragment.push_str(&format!(
                "<br /><br /><a href=\"{media_url}:large\"><img src=\"{media_url}:small\"></a>"
            )),
            MediaKind::Other(_) => {
                let href = expanded_url.as_deref().unwrap_or(url);
                let label = display_url.as_deref().unwrap_or(url);
                fragment.push_str(&format!("<a href=\"{href}\">{label}</a>"));
            }
        }
        marker = Some(url.as_str());
    }

    match marker {
        Some(marker) => text.replace(marker, &fragment),
        None => text,
    }
}
