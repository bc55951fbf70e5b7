use std::env;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result, anyhow};
use post_embed::{Config, Credentials, TwitterClient, embed_post_html, parse_post_id};
use reqwest::Client;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the fragment, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let post_url = env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: post-embed <post-url>"))?;

    // Reject bad input before touching credentials or the network.
    parse_post_id(&post_url)?;

    let cfg = Config::from_env()?;
    let credentials = Credentials::from_env()?;

    let http = Client::builder()
        .connect_timeout(StdDuration::from_secs(10))
        .timeout(StdDuration::from_secs(30))
        .user_agent(concat!("post-embed/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let api = TwitterClient::new(http.clone(), &cfg.api_base, credentials, cfg.max_elapsed);

    let html = embed_post_html(&api, &http, &post_url, &cfg)
        .await
        .with_context(|| format!("embedding {post_url}"))?;
    println!("{html}");
    Ok(())
}
