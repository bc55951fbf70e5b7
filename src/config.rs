use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

use crate::error::{Error, Result};
use crate::template::BindOptions;
use crate::twitter::DEFAULT_API_BASE;

pub struct Config {
    pub timezone: Tz,
    /// Where avatars are cached.
    pub image_dir: PathBuf,
    /// URL path the blog serves `image_dir` under.
    pub avatar_prefix: String,
    pub extra_css: String,
    pub api_base: String,
    /// Give up retrying the API after this long.
    pub max_elapsed: Duration,
}

impl Default for Config {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        Self {
            timezone: chrono_tz::Europe::London,
            image_dir: PathBuf::from(home).join("images"),
            avatar_prefix: "/images/".into(),
            extra_css: String::new(),
            api_base: DEFAULT_API_BASE.into(),
            max_elapsed: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary variable source; unset variables keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let d = Self::default();
        let timezone = match lookup("EMBED_TIMEZONE") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| Error::Configuration(format!("EMBED_TIMEZONE={name}: {e}")))?,
            None => d.timezone,
        };
        Ok(Self {
            timezone,
            image_dir: lookup("EMBED_IMAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(d.image_dir),
            avatar_prefix: lookup("EMBED_AVATAR_PREFIX").unwrap_or(d.avatar_prefix),
            extra_css: lookup("EMBED_EXTRA_CSS").unwrap_or(d.extra_css),
            api_base: lookup("TWITTER_API_BASE").unwrap_or(d.api_base),
            max_elapsed: lookup("TWITTER_MAX_ELAPSED_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(d.max_elapsed),
        })
    }

    pub fn bind_options(&self) -> BindOptions {
        BindOptions {
            timezone: self.timezone,
            avatar_prefix: self.avatar_prefix.clone(),
            extra_css: self.extra_css.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::from_lookup(|_| None).unwrap();
        assert_eq!(cfg.timezone, chrono_tz::Europe::London);
        assert_eq!(cfg.avatar_prefix, "/images/");
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.max_elapsed, Duration::from_secs(30));
        assert!(cfg.extra_css.is_empty());
    }

    #[test]
    fn reads_overrides() {
        let vars: HashMap<&str, &str> = [
            ("EMBED_TIMEZONE", "America/New_York"),
            ("EMBED_IMAGE_DIR", "/tmp/img"),
            ("EMBED_EXTRA_CSS", "margin: 0;"),
            ("TWITTER_MAX_ELAPSED_SECS", "5"),
        ]
        .into_iter()
        .collect();
        let cfg = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.timezone, chrono_tz::America::New_York);
        assert_eq!(cfg.image_dir, PathBuf::from("/tmp/img"));
        assert_eq!(cfg.bind_options().extra_css, "margin: 0;");
        assert_eq!(cfg.max_elapsed, Duration::from_secs(5));
    }

    #[test]
    fn unknown_timezone_is_a_configuration_error() {
        let res = Config::from_lookup(|k| (k == "EMBED_TIMEZONE").then(|| "Mars/Olympus".into()));
        assert!(matches!(res, Err(Error::Configuration(_))));
    }
}
