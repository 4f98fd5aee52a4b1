//! Top-level request router.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, warn};

use super::eligibility::check_message;
use super::home::render_home;
use super::types::{
    event_type, EventPayload, InboundRequest, InnerEvent, Payload, ResponseEnvelope,
    APP_HOME_OPENED, MESSAGE,
};
use super::HandlerError;
use crate::slack::SlackApi;
use crate::suggest::{Suggester, SuggestionDispatcher};
use crate::web::signature::is_verified;
use crate::Config;

/// Routes one request at a time through verification and dispatch.
///
/// Holds only immutable configuration and the Slack client, so a single
/// instance is shared across all requests.
#[derive(Clone)]
pub struct EventHandler {
    config: Arc<Config>,
    api: Arc<dyn SlackApi>,
    dispatcher: SuggestionDispatcher,
}

impl EventHandler {
    pub fn new(config: Arc<Config>, api: Arc<dyn SlackApi>) -> Self {
        let suggester = match &config.keywords {
            Some(pairs) => Suggester::new(pairs.clone()),
            None => Suggester::default(),
        };

        Self {
            dispatcher: SuggestionDispatcher::new(api.clone(), suggester),
            config,
            api,
        }
    }

    /// Handle a request and always produce a response envelope.
    pub async fn handle(&self, request: &InboundRequest) -> ResponseEnvelope {
        info!(
            method = %request.http_method,
            body_length = request.body().len(),
            has_signature = request.verification_context().signature.is_some(),
            "slack_request_received"
        );

        match self.route(request).await {
            Ok(body) => {
                info!("slack_request_ok");
                ResponseEnvelope::ok(&body)
            }
            Err(e) => {
                warn!(error = %e, "slack_request_failed");
                ResponseEnvelope::error(&e)
            }
        }
    }

    async fn route(&self, request: &InboundRequest) -> Result<Value, HandlerError> {
        if request.http_method != "POST" {
            return Err(HandlerError::UnsupportedMethod(request.http_method.clone()));
        }

        let payload = EventPayload::parse(request.body())?;
        info!(payload_type = %payload.kind, "slack_payload_parsed");

        match payload.classify()? {
            Payload::UrlVerification { challenge } => {
                // No signing secret exists yet during initial app setup
                info!("slack_challenge_echoed");
                Ok(match challenge {
                    Some(challenge) => json!({ "challenge": challenge }),
                    None => json!({}),
                })
            }
            Payload::EventCallback { event } => {
                if !is_verified(
                    self.config.signing_secret.as_deref(),
                    &request.verification_context(),
                    self.config.signature_max_age,
                ) {
                    return Err(HandlerError::VerificationFailed);
                }
                info!("slack_request_verified");

                let event = event.ok_or(HandlerError::MissingEvent)?;
                self.handle_event(event).await?;
                Ok(Value::Null)
            }
        }
    }

    /// Only the two handled types are read into `InnerEvent`; anything else is
    /// acknowledged whatever its shape.
    async fn handle_event(&self, event: Value) -> Result<(), HandlerError> {
        let kind = event_type(&event).to_string();

        match kind.as_str() {
            MESSAGE => self.handle_message(&InnerEvent::from_value(event)?).await,
            APP_HOME_OPENED => self.handle_home_opened(&InnerEvent::from_value(event)?).await,
            other => {
                info!(event_type = %other, "slack_event_ignored");
                Ok(())
            }
        }
    }

    async fn handle_message(&self, event: &InnerEvent) -> Result<(), HandlerError> {
        let eligibility = check_message(event, &self.config.target_channel_id);

        if !eligibility.is_eligible() {
            info!(
                channel = event.channel.as_deref().unwrap_or_default(),
                ts = event.ts.as_deref().unwrap_or_default(),
                reason = eligibility.as_str(),
                "slack_message_skipped"
            );
            return Ok(());
        }

        let channel = event.channel.as_deref().unwrap_or_default();
        let text = event.text.as_deref().unwrap_or_default();
        let ts = event.ts.as_deref().unwrap_or_default();

        info!(channel = %channel, ts = %ts, text_length = text.len(), "slack_message_eligible");

        let outcome = self.dispatcher.send(channel, text, ts).await?;
        info!(outcome = ?outcome, "slack_message_dispatched");

        Ok(())
    }

    async fn handle_home_opened(&self, event: &InnerEvent) -> Result<(), HandlerError> {
        let user = event.user.as_deref().unwrap_or_default();
        let request = render_home(user);

        let response = self.api.publish_view(&request).await?;

        if response.ok {
            info!(user = %user, "slack_home_published");
        } else {
            warn!(
                user = %user,
                error = response.error.as_deref().unwrap_or("unknown_error"),
                "slack_home_publish_rejected"
            );
        }

        Ok(())
    }
}
