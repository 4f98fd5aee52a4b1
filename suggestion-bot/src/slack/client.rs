//! reqwest-backed Slack Web API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info, warn};

use super::{ApiResponse, PostMessage, PublishView, SlackApi, SlackError};
use crate::Config;

/// Slack Web API client authenticated with the bot token.
#[derive(Clone)]
pub struct SlackClient {
    http: Client,
    base_url: String,
    bot_token: Option<String>,
}

impl SlackClient {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> Result<Self, SlackError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url: config.slack_api_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
        })
    }

    async fn call<T: Serialize + ?Sized>(
        &self,
        method: &str,
        payload: &T,
    ) -> Result<ApiResponse, SlackError> {
        let token = self.bot_token.as_deref().ok_or(SlackError::MissingToken)?;
        let url = format!("{}/{}", self.base_url, method);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                if e.is_timeout() {
                    error!(method = method, error = %e, "slack_api_timeout");
                } else {
                    error!(method = method, error = %e, "slack_api_request_error");
                }
                SlackError::from(e)
            })?;

        let status = response.status().as_u16();
        let body: ApiResponse = response.json().await?;

        if body.ok {
            info!(method = method, status_code = status, "slack_api_ok");
        } else {
            warn!(
                method = method,
                status_code = status,
                error = body.error.as_deref().unwrap_or("unknown_error"),
                "slack_api_not_ok"
            );
        }

        Ok(body)
    }
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn post_message(&self, message: &PostMessage) -> Result<ApiResponse, SlackError> {
        self.call("chat.postMessage", message).await
    }

    async fn publish_view(&self, request: &PublishView) -> Result<ApiResponse, SlackError> {
        self.call("views.publish", request).await
    }
}
