//! Web server module for the Slack Events API endpoint.
//!
//! Routes:
//! - `/slack/events` (any method): raw Slack requests
//! - `POST /gateway/events`: requests wrapped in a gateway JSON envelope
//! - `GET /health`

pub mod handlers;
pub mod signature;

use axum::{
    routing::{any, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{gateway_events, health, slack_events, AppState, HealthResponse};
pub use signature::{is_verified, verify_slack_signature, VerificationContext};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/slack/events", any(slack_events))
        .route("/gateway/events", post(gateway_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::fake::FakeSlack;
    use crate::web::signature::{compute_signature, SIGNATURE_HEADER, TIMESTAMP_HEADER};
    use crate::Config;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tower::ServiceExt;

    const SECRET: &str = "router-test-secret";

    fn app(slack: &Arc<FakeSlack>) -> Router {
        let config = Config {
            signing_secret: Some(SECRET.to_string()),
            ..Config::default()
        };
        router(AppState::new(config, slack.clone()))
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let slack = Arc::new(FakeSlack::default());
        let response = app(&slack)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_challenge_over_http() {
        let slack = Arc::new(FakeSlack::default());
        let response = app(&slack)
            .oneshot(
                Request::post("/slack/events")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"type":"url_verification","challenge":"abc123"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
        assert_eq!(body_text(response).await, r#"{"challenge":"abc123"}"#);
    }

    #[tokio::test]
    async fn test_get_is_rejected_over_http() {
        let slack = Arc::new(FakeSlack::default());
        let response = app(&slack)
            .oneshot(Request::get("/slack/events").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, r#""Unsupported method \"GET\"""#);
    }

    #[tokio::test]
    async fn test_signed_message_over_http() {
        let slack = Arc::new(FakeSlack::default());
        let body = serde_json::json!({
            "type": "event_callback",
            "event": {
                "type": "message",
                "user": "U123",
                "channel": "C013XMN8RL3",
                "text": "join #hiking",
                "ts": "1600000000.000100",
                "client_msg_id": "abc"
            }
        })
        .to_string();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            .to_string();
        let signature = compute_signature(SECRET, &timestamp, body.as_bytes()).unwrap();

        let response = app(&slack)
            .oneshot(
                Request::post("/slack/events")
                    .header(TIMESTAMP_HEADER, timestamp)
                    .header(SIGNATURE_HEADER, signature)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "null");
        assert_eq!(slack.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_gateway_envelope() {
        let slack = Arc::new(FakeSlack::default());
        let envelope = serde_json::json!({
            "httpMethod": "POST",
            "headers": {},
            "body": r#"{"type":"app_rate_limited"}"#
        });

        let response = app(&slack)
            .oneshot(
                Request::post("/gateway/events")
                    .header("content-type", "application/json")
                    .body(Body::from(envelope.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["statusCode"], "400");
        assert_eq!(json["body"], r#""Unsupported type \"app_rate_limited\"""#);
        assert_eq!(json["headers"]["Content-Type"], "application/json");
    }

    #[tokio::test]
    async fn test_gateway_envelope_without_method() {
        let slack = Arc::new(FakeSlack::default());
        let response = app(&slack)
            .oneshot(
                Request::post("/gateway/events")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"body":"{}"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["statusCode"], "400");
        assert_eq!(json["body"], r#""Unsupported method \"\"""#);
    }

    #[tokio::test]
    async fn test_gateway_malformed_envelope() {
        let slack = Arc::new(FakeSlack::default());
        // No content type and not JSON: still answered with an envelope
        let response = app(&slack)
            .oneshot(
                Request::post("/gateway/events")
                    .body(Body::from("httpMethod=POST"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["statusCode"], "400");
        assert!(json["body"]
            .as_str()
            .unwrap()
            .contains("Invalid request body"));
        assert!(slack.messages().is_empty());
    }
}
