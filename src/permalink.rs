use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static PERMALINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^/\s]+/(?:#!/)?[A-Za-z0-9_]+/status(?:es)?/([0-9]+)$")
        .expect("permalink regex should compile")
});

/// Numeric post identifier, kept as the digit string the API expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostId(String);

impl PostId {
    /// Wrap an id that is already known to be numeric, e.g. from an API
    /// response.
    pub(crate) fn from_digits(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the post id from a permalink such as
/// `https://twitter.com/punchfork/status/16342628623`.
///
/// The whole string has to match; anything trailing the digits is rejected.
pub fn parse_post_id(url: &str) -> Result<PostId> {
    PERMALINK_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| PostId(m.as_str().to_string()))
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))
}
