//! Slack Web API module.
//!
//! This module provides:
//! - Block Kit types for the home tab view
//! - The `SlackApi` trait the event handler talks to
//! - A reqwest-backed client for `chat.postMessage` and `views.publish`

pub mod blocks;
pub mod client;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use blocks::{Block, Text, View};
pub use client::SlackClient;

/// Errors raised while talking to the Slack Web API.
#[derive(Debug, Error)]
pub enum SlackError {
    #[error("Slack request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Slack API error: {0}")]
    Api(String),

    #[error("SLACK_BOT_TOKEN is not configured")]
    MissingToken,
}

/// Minimal view of a Slack Web API response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    /// Turn an `ok: false` response into an error.
    pub fn into_result(self) -> Result<ApiResponse, SlackError> {
        if self.ok {
            Ok(self)
        } else {
            Err(SlackError::Api(
                self.error.unwrap_or_else(|| "unknown_error".to_string()),
            ))
        }
    }
}

/// `chat.postMessage` arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMessage {
    pub channel: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}

/// `views.publish` arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishView {
    pub user_id: String,
    pub view: View,
}

/// The Slack operations the event handler depends on.
///
/// Transport failures come back as `Err`; API-level failures come back as
/// `Ok` with `ok == false` so callers decide how strict to be.
#[async_trait]
pub trait SlackApi: Send + Sync {
    async fn post_message(&self, message: &PostMessage) -> Result<ApiResponse, SlackError>;

    async fn publish_view(&self, request: &PublishView) -> Result<ApiResponse, SlackError>;
}
