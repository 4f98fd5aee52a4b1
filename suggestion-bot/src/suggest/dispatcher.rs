//! Posting channel suggestions back into the introduction thread.

use std::sync::Arc;

use tracing::info;

use super::keywords::{reply_text, Suggester};
use crate::slack::{PostMessage, SlackApi, SlackError};

/// Result of a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing in the text matched, no reply was posted
    NoMatch,
    /// A reply listing `channels` was posted
    Posted { channels: Vec<String> },
}

/// Turns an eligible message into a threaded suggestion reply.
#[derive(Clone)]
pub struct SuggestionDispatcher {
    api: Arc<dyn SlackApi>,
    suggester: Suggester,
}

impl SuggestionDispatcher {
    pub fn new(api: Arc<dyn SlackApi>, suggester: Suggester) -> Self {
        Self { api, suggester }
    }

    /// Suggest channels for `text` and reply in the thread anchored at `ts`.
    ///
    /// Transport failures and `ok: false` responses are both returned as
    /// errors. Nothing is retried.
    pub async fn send(
        &self,
        channel: &str,
        text: &str,
        ts: &str,
    ) -> Result<DispatchOutcome, SlackError> {
        let suggestions = self.suggester.suggest(text);

        if suggestions.is_empty() {
            info!(channel = %channel, ts = %ts, "suggestion_no_match");
            return Ok(DispatchOutcome::NoMatch);
        }

        let message = PostMessage {
            channel: channel.to_string(),
            text: reply_text(&suggestions),
            thread_ts: Some(ts.to_string()),
        };

        self.api.post_message(&message).await?.into_result()?;

        let channels: Vec<String> = suggestions.into_iter().map(|s| s.channel).collect();

        info!(
            channel = %channel,
            ts = %ts,
            suggested = ?channels,
            "suggestion_posted"
        );

        Ok(DispatchOutcome::Posted { channels })
    }
}
