use std::path::{Path, PathBuf};

use reqwest::Client;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Ask for the 73px variant instead of the 48px one the API hands out.
pub fn bigger_avatar_url(profile_image_url: &str) -> String {
    profile_image_url.replace("_normal", "_bigger")
}

/// `twavatar_<handle>.jpeg`, then `twavatar_<handle>_1.jpeg`, `_2`, ...
pub fn candidate_filenames(handle: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(format!("twavatar_{handle}.jpeg"))
        .chain((1..).map(move |i| format!("twavatar_{handle}_{i}.jpeg")))
}

fn content_hash(bytes: &[u8]) -> Vec<u8> {
    Sha256::digest(bytes).to_vec()
}

/// Store `bytes` under the first free candidate name in `dir`, or reuse an
/// existing file with identical content. Returns the bare file name.
pub async fn store_avatar(dir: &Path, handle: &str, bytes: &[u8]) -> Result<String> {
    fs::create_dir_all(dir).await?;
    let wanted = content_hash(bytes);

    for name in candidate_filenames(handle) {
        let path: PathBuf = dir.join(&name);
        match fs::read(&path).await {
            Ok(existing) if content_hash(&existing) == wanted => {
                debug!("avatar for @{handle} already cached as {name}");
                return Ok(name);
            }
            Ok(_) => continue,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                fs::write(&path, bytes).await?;
                info!("cached avatar for @{handle} as {}", path.display());
                return Ok(name);
            }
            Err(e) => return Err(Error::Io(e)),
        }
    }
    unreachable!("candidate_filenames never ends")
}

/// Download the author's avatar into `dir` and return the cached file name.
pub async fn cache_avatar(
    http: &Client,
    dir: &Path,
    profile_image_url: &str,
    handle: &str,
) -> Result<String> {
    let url = bigger_avatar_url(profile_image_url);
    let bytes = http
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    store_avatar(dir, handle, &bytes).await
}
