//! Request, payload and response types for the Slack Events API endpoint.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::HandlerError;
use crate::web::signature::{VerificationContext, SIGNATURE_HEADER, TIMESTAMP_HEADER};

/// Payload `type` for the one-time endpoint ownership handshake.
pub const URL_VERIFICATION: &str = "url_verification";

/// Payload `type` wrapping a workspace event.
pub const EVENT_CALLBACK: &str = "event_callback";

/// Inner event type for channel messages.
pub const MESSAGE: &str = "message";

/// Inner event type sent when a user opens the app's home tab.
pub const APP_HOME_OPENED: &str = "app_home_opened";

// =============================================================================
// Inbound
// =============================================================================

/// One inbound HTTP request as seen by the handler.
///
/// Deserializes from the gateway-style envelope
/// `{"httpMethod": .., "headers": {..}, "body": ".."}`. The body is kept as
/// raw bytes so the signature is checked over exactly what was received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundRequest {
    #[serde(default)]
    pub http_method: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default, deserialize_with = "body_from_text")]
    pub body: Vec<u8>,
}

fn body_from_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .map(String::into_bytes)
        .unwrap_or_default())
}

impl InboundRequest {
    pub fn new(
        http_method: impl Into<String>,
        headers: HashMap<String, String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            http_method: http_method.into(),
            headers,
            body: body.into(),
        }
    }

    /// Raw body bytes, empty when absent.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Signing metadata for this request.
    pub fn verification_context(&self) -> VerificationContext<'_> {
        VerificationContext {
            timestamp: self.header(TIMESTAMP_HEADER),
            signature: self.header(SIGNATURE_HEADER),
            body: self.body(),
        }
    }
}

/// Parsed request body, before classification.
///
/// Only `type` is interpreted up front. `event` stays untyped until the
/// request is verified and its inner type is one the handler acts on.
#[derive(Debug, Clone, PartialEq)]
pub struct EventPayload {
    pub kind: String,
    pub challenge: Option<Value>,
    pub event: Option<Value>,
}

/// A payload reduced to the one field its `type` makes meaningful.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    UrlVerification { challenge: Option<Value> },
    EventCallback { event: Option<Value> },
}

impl EventPayload {
    /// Parse a raw body. Fails only when the body is not JSON.
    pub fn parse(body: &[u8]) -> Result<Self, HandlerError> {
        let value: Value = serde_json::from_slice(body)?;
        Ok(Self::from_value(value))
    }

    pub fn from_value(mut value: Value) -> Self {
        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };

        let mut take = |field: &str| {
            value
                .get_mut(field)
                .map(Value::take)
                .filter(|v| !v.is_null())
        };

        Self {
            kind,
            challenge: take("challenge"),
            event: take("event"),
        }
    }

    pub fn classify(self) -> Result<Payload, HandlerError> {
        match self.kind.as_str() {
            URL_VERIFICATION => Ok(Payload::UrlVerification {
                challenge: self.challenge,
            }),
            EVENT_CALLBACK => Ok(Payload::EventCallback { event: self.event }),
            _ => Err(HandlerError::UnsupportedType(self.kind)),
        }
    }
}

/// The inner `type` of an untyped event, empty when absent or not a string.
pub fn event_type(event: &Value) -> &str {
    event.get("type").and_then(Value::as_str).unwrap_or_default()
}

/// The `event` object of a `message` or `app_home_opened` callback.
///
/// Only the fields the handler reads are kept; everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InnerEvent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    /// Set when a bot (including this one) authored the message
    #[serde(default)]
    pub bot_id: Option<String>,
    /// Set only for messages typed by a person
    #[serde(default)]
    pub client_msg_id: Option<String>,
    /// Set when the message belongs to a thread
    #[serde(default)]
    pub thread_ts: Option<String>,
}

impl InnerEvent {
    pub fn from_value(event: Value) -> Result<Self, HandlerError> {
        Ok(serde_json::from_value(event)?)
    }
}

// =============================================================================
// Outbound
// =============================================================================

/// Response handed back to the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: String,
    /// JSON text, encoded exactly once
    pub body: String,
    pub headers: BTreeMap<String, String>,
}

impl ResponseEnvelope {
    fn new(status_code: &str, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code: status_code.to_string(),
            body,
            headers,
        }
    }

    /// 200 with `body` serialized as JSON.
    pub fn ok(body: &Value) -> Self {
        Self::new("200", encode(body))
    }

    /// 400 with the error message serialized as a JSON string.
    pub fn error(error: &HandlerError) -> Self {
        Self::new("400", encode(&Value::String(error.to_string())))
    }

    pub fn is_success(&self) -> bool {
        self.status_code == "200"
    }
}

fn encode(body: &Value) -> String {
    serde_json::to_string(body).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inbound_request_from_gateway_envelope() {
        let raw = json!({
            "httpMethod": "POST",
            "headers": { "x-slack-signature": "v0=abc", "X-Slack-Request-Timestamp": "1" },
            "body": "{\"type\":\"url_verification\"}",
            "isBase64Encoded": false
        });

        let request: InboundRequest = serde_json::from_value(raw).unwrap();

        assert_eq!(request.http_method, "POST");
        assert_eq!(request.header("X-Slack-Signature"), Some("v0=abc"));
        assert_eq!(request.header("x-slack-request-timestamp"), Some("1"));
        assert_eq!(request.body(), b"{\"type\":\"url_verification\"}");

        let context = request.verification_context();
        assert_eq!(context.signature, Some("v0=abc"));
        assert_eq!(context.timestamp, Some("1"));
    }

    #[test]
    fn test_inbound_request_missing_fields() {
        let request: InboundRequest =
            serde_json::from_value(json!({ "body": null })).unwrap();
        assert_eq!(request.http_method, "");
        assert!(request.body().is_empty());
        assert!(request.header("X-Slack-Signature").is_none());
    }

    #[test]
    fn test_classify() {
        let payload =
            EventPayload::parse(br#"{"type":"url_verification","challenge":"abc"}"#).unwrap();
        assert_eq!(
            payload.classify().unwrap(),
            Payload::UrlVerification {
                challenge: Some(json!("abc"))
            }
        );

        let payload = EventPayload::parse(
            br#"{"type":"event_callback","event":{"type":"message","channel":"C1","extra":1}}"#,
        )
        .unwrap();
        match payload.classify().unwrap() {
            Payload::EventCallback { event: Some(event) } => {
                assert_eq!(event_type(&event), "message");
                let event = InnerEvent::from_value(event).unwrap();
                assert_eq!(event.channel.as_deref(), Some("C1"));
                assert!(event.bot_id.is_none());
            }
            other => panic!("Expected EventCallback, got {:?}", other),
        }

        let payload = EventPayload::parse(br#"{"type":"block_actions"}"#).unwrap();
        let err = payload.classify().unwrap_err();
        assert_eq!(err.to_string(), r#"Unsupported type "block_actions""#);
    }

    #[test]
    fn test_classify_tolerates_untyped_shapes() {
        // Events with object-valued user/channel are only classified, not typed
        let payload = EventPayload::parse(
            br#"{"type":"event_callback","event":{"type":"team_join","user":{"id":"U1"}}}"#,
        )
        .unwrap();
        match payload.classify().unwrap() {
            Payload::EventCallback { event: Some(event) } => {
                assert_eq!(event_type(&event), "team_join")
            }
            other => panic!("Expected EventCallback, got {:?}", other),
        }

        let err = EventPayload::parse(br#"{"type":7}"#).unwrap().classify().unwrap_err();
        assert_eq!(err.to_string(), r#"Unsupported type "7""#);

        let err = EventPayload::parse(b"[1,2]").unwrap().classify().unwrap_err();
        assert_eq!(err.to_string(), r#"Unsupported type """#);

        assert!(EventPayload::parse(b"not json").is_err());
        assert_eq!(event_type(&json!({ "type": 3 })), "");
    }

    #[test]
    fn test_response_envelope_encoding() {
        let ok = ResponseEnvelope::ok(&json!({ "challenge": "abc" }));
        assert_eq!(ok.status_code, "200");
        assert_eq!(ok.body, r#"{"challenge":"abc"}"#);
        assert_eq!(ok.headers["Content-Type"], "application/json");

        let ack = ResponseEnvelope::ok(&Value::Null);
        assert_eq!(ack.body, "null");

        let err = ResponseEnvelope::error(&HandlerError::UnsupportedMethod("GET".to_string()));
        assert_eq!(err.status_code, "400");
        assert_eq!(err.body, r#""Unsupported method \"GET\"""#);
        assert!(!err.is_success());

        let wire = serde_json::to_value(&ok).unwrap();
        assert_eq!(wire["statusCode"], "200");
    }
}
