//! Slack request signature verification.
//!
//! Slack signs every Events API request using HMAC-SHA256.
//! Reference: https://api.slack.com/authentication/verifying-requests-from-slack

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the Unix epoch seconds at which Slack sent the request.
pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";

/// Header carrying the `v0=<hex>` request signature.
pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";

/// Signature scheme version prefix.
pub const SIGNATURE_VERSION: &str = "v0";

/// Signing metadata pulled out of a single request.
#[derive(Debug, Clone, Copy)]
pub struct VerificationContext<'a> {
    pub timestamp: Option<&'a str>,
    pub signature: Option<&'a str>,
    pub body: &'a [u8],
}

/// Compute the `v0=<hex>` signature Slack would send for this timestamp and body.
pub fn compute_signature(signing_secret: &str, timestamp: &str, body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes()).ok()?;
    mac.update(format!("{}:{}:", SIGNATURE_VERSION, timestamp).as_bytes());
    mac.update(body);
    Some(format!(
        "{}={}",
        SIGNATURE_VERSION,
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Verify a Slack request signature.
///
/// Slack sends two headers alongside the raw body:
/// - `X-Slack-Request-Timestamp`: Unix epoch seconds when the request was sent
/// - `X-Slack-Signature`: `v0=` + HMAC-SHA256 hex digest of `v0:{timestamp}:{body}`
///
/// # Arguments
///
/// * `signing_secret` - The app's signing secret, if one is configured
/// * `context` - Headers and raw body of the request
/// * `max_age_seconds` - Maximum allowed clock distance of the timestamp
/// * `now` - Current Unix epoch seconds
///
/// # Returns
///
/// `true` if the signature is valid and not stale, `false` otherwise.
pub fn verify_slack_signature(
    signing_secret: Option<&str>,
    context: &VerificationContext<'_>,
    max_age_seconds: u64,
    now: u64,
) -> bool {
    let signing_secret = signing_secret.map(str::trim).unwrap_or_default();
    let timestamp = context.timestamp.map(str::trim).unwrap_or_default();
    let signature = context.signature.map(str::trim).unwrap_or_default();

    if signing_secret.is_empty() || timestamp.is_empty() || signature.is_empty() {
        warn!(
            has_signing_secret = !signing_secret.is_empty(),
            has_timestamp = !timestamp.is_empty(),
            has_signature = !signature.is_empty(),
            "slack_signature_missing_fields"
        );
        return false;
    }

    let request_time: u64 = match timestamp.parse() {
        Ok(t) => t,
        Err(_) => {
            warn!(timestamp = %timestamp, "slack_signature_invalid_timestamp");
            return false;
        }
    };

    let age = now.abs_diff(request_time);
    if age > max_age_seconds {
        warn!(
            request_time = request_time,
            current_time = now,
            age_seconds = age,
            max_age_seconds = max_age_seconds,
            "slack_signature_stale"
        );
        return false;
    }

    let expected_signature = match compute_signature(signing_secret, timestamp, context.body) {
        Some(s) => s,
        None => {
            warn!("slack_signature_invalid_key");
            return false;
        }
    };

    let valid = constant_time_compare(&expected_signature, signature);

    if !valid {
        warn!(
            expected_length = expected_signature.len(),
            actual_length = signature.len(),
            "slack_signature_mismatch"
        );
    }

    valid
}

/// Verify a request against the wall clock.
pub fn is_verified(
    signing_secret: Option<&str>,
    context: &VerificationContext<'_>,
    max_age_seconds: u64,
) -> bool {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    verify_slack_signature(signing_secret, context, max_age_seconds, now)
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
