//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup and shared read-only afterwards.

use std::env;
use tracing::warn;
use url::Url;

use crate::suggest::is_matchable;

/// Channel that introductions are posted to.
pub const DEFAULT_TARGET_CHANNEL_ID: &str = "C013XMN8RL3";

/// Base URL of the Slack Web API.
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Slack signing secret for request signature verification
    pub signing_secret: Option<String>,

    /// Bot token used for `chat.postMessage` and `views.publish`
    pub bot_token: Option<String>,

    /// Only messages in this channel are answered
    pub target_channel_id: String,

    /// Slack Web API base URL (no trailing slash)
    pub slack_api_url: String,

    /// Maximum age in seconds for request timestamps
    pub signature_max_age: u64,

    /// Outbound HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Keyword to channel-name pairs, overriding the built-in map
    pub keywords: Option<Vec<(String, String)>>,

    /// Port for the web server to listen on
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            signing_secret: None,
            bot_token: None,
            target_channel_id: DEFAULT_TARGET_CHANNEL_ID.to_string(),
            slack_api_url: DEFAULT_SLACK_API_URL.to_string(),
            signature_max_age: 300,
            request_timeout_ms: 8000,
            keywords: None,
            port: 8080,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            signing_secret: non_empty("SLACK_SIGNING_SECRET"),

            bot_token: non_empty("SLACK_BOT_TOKEN"),

            target_channel_id: non_empty("TARGET_CHANNEL_ID")
                .unwrap_or(defaults.target_channel_id),

            slack_api_url: parse_api_url("SLACK_API_URL", DEFAULT_SLACK_API_URL),

            signature_max_age: parse_number("SLACK_SIGNATURE_MAX_AGE", defaults.signature_max_age),

            request_timeout_ms: parse_number("SLACK_REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),

            keywords: parse_keywords("SUGGESTION_KEYWORDS"),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
        }
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(env_var = name, value = %raw, "Invalid number, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Parse and validate the API base URL, stripping any trailing slash.
fn parse_api_url(name: &str, default: &str) -> String {
    let raw = match env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => return default.to_string(),
    };

    match Url::parse(raw.trim()) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            url.as_str().trim_end_matches('/').to_string()
        }
        _ => {
            warn!(env_var = name, value = %raw, "Invalid API url, using default");
            default.to_string()
        }
    }
}

/// Parse a comma-separated list of `keyword=channel` pairs.
fn parse_keywords(name: &str) -> Option<Vec<(String, String)>> {
    let raw = env::var(name).ok()?;

    let pairs: Vec<(String, String)> = raw
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|entry| match entry.split_once('=') {
            Some((keyword, _)) if !keyword.trim().is_empty() && !is_matchable(keyword.trim()) => {
                warn!(env_var = name, entry = %entry, "Keyword is not a single word, skipping");
                None
            }
            Some((keyword, channel)) if !keyword.trim().is_empty() && !channel.trim().is_empty() => {
                Some((
                    keyword.trim().to_lowercase(),
                    channel.trim().trim_start_matches('#').to_string(),
                ))
            }
            _ => {
                warn!(env_var = name, entry = %entry, "Invalid keyword entry, skipping");
                None
            }
        })
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs)
    }
}
