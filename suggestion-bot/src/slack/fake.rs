//! In-memory `SlackApi` that records calls.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{ApiResponse, PostMessage, PublishView, SlackApi, SlackError};

#[derive(Default)]
pub struct FakeSlack {
    pub messages: Mutex<Vec<PostMessage>>,
    pub views: Mutex<Vec<PublishView>>,
    /// Returned as `Err(SlackError::Api(..))` from every call when set.
    pub fail_with: Option<String>,
    /// Returned as `Ok(ApiResponse { ok: false, .. })` from every call when set.
    pub not_ok_with: Option<String>,
}

impl FakeSlack {
    pub fn failing(error: &str) -> Self {
        Self {
            fail_with: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn not_ok(error: &str) -> Self {
        Self {
            not_ok_with: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<PostMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn views(&self) -> Vec<PublishView> {
        self.views.lock().unwrap().clone()
    }

    fn respond(&self) -> Result<ApiResponse, SlackError> {
        if let Some(error) = &self.fail_with {
            return Err(SlackError::Api(error.clone()));
        }
        Ok(ApiResponse {
            ok: self.not_ok_with.is_none(),
            error: self.not_ok_with.clone(),
        })
    }
}

#[async_trait]
impl SlackApi for FakeSlack {
    async fn post_message(&self, message: &PostMessage) -> Result<ApiResponse, SlackError> {
        self.messages.lock().unwrap().push(message.clone());
        self.respond()
    }

    async fn publish_view(&self, request: &PublishView) -> Result<ApiResponse, SlackError> {
        self.views.lock().unwrap().push(request.clone());
        self.respond()
    }
}
