use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use reqwest::Client;
use tracing::info;

pub mod avatar;
pub mod config;
pub mod error;
pub mod model;
pub mod oauth;
pub mod permalink;
pub mod render;
pub mod template;
pub mod twitter;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{Author, Entity, EntityKind, MediaKind, Post, Span};
pub use oauth::Credentials;
pub use permalink::{PostId, parse_post_id};
pub use render::render_body;
pub use template::{BindOptions, bind_template};
pub use twitter::TwitterClient;

/// Plain-text name of the client a post was sent from.
///
/// The API delivers `source` as an anchor such as
/// `<a href="http://twitter.com" rel="nofollow">Twitter Web Client</a>`;
/// this keeps the text, decodes entities and collapses whitespace.
pub fn source_name(source: &str) -> String {
    let dom = html5ever::parse_document(RcDom::default(), Default::default()).one(source);

    fn walk(handle: &Handle, out: &mut String) {
        match &handle.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { name, .. }
                if matches!(&*name.local, "script" | "style" | "title") =>
            {
                return;
            }
            _ => {}
        }
        for child in handle.children.borrow().iter() {
            walk(child, out);
        }
    }

    let mut text = String::new();
    walk(&dom.document, &mut text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render an already fetched post into its embed fragment.
pub fn embed_post(post: &Post, post_url: &str, avatar: &str, opts: &BindOptions) -> String {
    let text = render_body(&post.text, &post.entities);
    bind_template(post, &text, post_url, avatar, opts)
}

/// Fetch the post behind `post_url`, cache its author's avatar and render the
/// fragment. Any failure aborts the whole embed.
pub async fn embed_post_html(
    api: &TwitterClient,
    http: &Client,
    post_url: &str,
    cfg: &Config,
) -> Result<String> {
    let id = parse_post_id(post_url)?;
    let post = api.fetch_post(&id).await?;
    let avatar = avatar::cache_avatar(
        http,
        &cfg.image_dir,
        &post.author.avatar_url,
        &post.author.screen_name,
    )
    .await?;
    info!("rendering post {id} with avatar {avatar}");
    Ok(embed_post(&post, post_url, &avatar, &cfg.bind_options()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_name_collapses_whitespace() {
        let src = "<a href=\"x\">
  Twitter   for 	 iPhone </a>";
        assert_eq!(source_name(src), "Twitter for iPhone");
    }

    #[test]
    fn source_name_strips_anchor() {
        let src = r#"<a href="http://twitter.com/download/iphone" rel="nofollow">Twitter for iPhone</a>"#;
        assert_eq!(source_name(src), "Twitter for iPhone");
    }

    #[test]
    fn source_name_decodes_entities() {
        assert_eq!(source_name("<a href=\"x\">Tom &amp; Jerry</a>"), "Tom & Jerry");
    }

    #[test]
    fn source_name_passes_plain_text_and_empty() {
        assert_eq!(source_name("web"), "web");
        assert_eq!(source_name(""), "");
    }
}
