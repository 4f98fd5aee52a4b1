//! HTTP endpoint handlers.
//!
//! These are thin adapters: they turn an axum request into an
//! `InboundRequest`, hand it to the `EventHandler`, and turn the
//! `ResponseEnvelope` back into an HTTP response.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::events::{EventHandler, HandlerError, InboundRequest, ResponseEnvelope};
use crate::slack::SlackApi;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<EventHandler>,
}

impl AppState {
    pub fn new(config: Config, api: Arc<dyn SlackApi>) -> Self {
        Self {
            handler: Arc::new(EventHandler::new(Arc::new(config), api)),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Slack Events
// =============================================================================

/// Slack Events API endpoint.
///
/// Mounted for every method so non-POST requests get the same 400 envelope
/// as any other failure.
pub async fn slack_events(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = InboundRequest::new(method.as_str(), header_map(&headers), body.to_vec());

    state.handler.handle(&request).await.into_response()
}

/// Gateway-style endpoint: takes the whole request as a JSON envelope and
/// returns the response envelope as JSON.
///
/// The envelope is decoded by hand so a malformed one still gets a 400
/// envelope rather than an extractor rejection.
pub async fn gateway_events(State(state): State<AppState>, body: Bytes) -> Json<ResponseEnvelope> {
    match serde_json::from_slice::<InboundRequest>(&body) {
        Ok(request) => Json(state.handler.handle(&request).await),
        Err(e) => {
            warn!(error = %e, body_length = body.len(), "gateway_envelope_invalid");
            Json(ResponseEnvelope::error(&HandlerError::InvalidBody(e)))
        }
    }
}

fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let status = self
            .status_code
            .parse::<u16>()
            .ok()
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::BAD_REQUEST);

        let mut response = (status, self.body).into_response();
        let out = response.headers_mut();

        for (name, value) in &self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    out.insert(name, value);
                }
                _ => warn!(header = %name, "response_header_invalid"),
            }
        }

        if !out.contains_key(CONTENT_TYPE) {
            out.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        response
    }
}
