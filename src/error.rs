use reqwest::StatusCode;

/// Errors raised while turning a permalink into an embed.
///
/// Missing optional fields on entities or authors are not errors; the
/// renderer falls back to the raw form instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The permalink does not look like `https://host/handle/status/<digits>`.
    #[error("invalid post URL: {0}")]
    InvalidUrl(String),

    /// A credential or setting is missing or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("api returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("bad timestamp: {0}")]
    Timestamp(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
