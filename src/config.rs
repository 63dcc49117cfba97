//! Runtime configuration utilities for diapredict.

use std::{env, path::PathBuf, time::Duration};

/// Engine base URL used when `DIAPREDICT_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REVEAL_DELAY_MS: u64 = 800;
/// Stylesheet directory, relative to the working directory, used when
/// `DIAPREDICT_STATIC_DIR` is unset.
pub const DEFAULT_STATIC_DIR: &str = "src/ui/static";

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the prediction engine, without trailing slash.
    pub api_url: String,
    /// Deadline applied to every engine request.
    pub request_timeout: Duration,
    /// Pause between a successful prediction and showing the result.
    pub reveal_delay: Duration,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            reveal_delay: Duration::from_millis(DEFAULT_REVEAL_DELAY_MS),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let api_url = env::var("DIAPREDICT_API_URL")
            .map(|v| normalize_base_url(&v))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let request_timeout = env::var("DIAPREDICT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| parse_timeout_secs(&v))
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let reveal_delay = env::var("DIAPREDICT_REVEAL_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_REVEAL_DELAY_MS));
        let static_dir = env::var("DIAPREDICT_STATIC_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        Ok(Self {
            api_url,
            request_timeout,
            reveal_delay,
            static_dir,
        })
    }

    /// Replace the engine base URL, e.g. from a `--api-url` flag.
    pub fn with_api_url(mut self, api_url: Option<&str>) -> Self {
        if let Some(url) = api_url {
            self.api_url = normalize_base_url(url);
        }
        self
    }

    /// Join a path onto the engine base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

/// Strip surrounding whitespace and trailing slashes from a base URL.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse a request deadline in whole seconds. Zero is not a usable deadline
/// and yields `None`, as does anything that is not a number.
pub fn parse_timeout_secs(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
