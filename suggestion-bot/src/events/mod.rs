//! Slack Events API handling.
//!
//! ## Processing Flow
//!
//! ```text
//! InboundRequest → method → payload type ─┬─ url_verification → {"challenge"}
//!                                         └─ event_callback → verify ─┬─ message → eligibility → dispatcher
//!                                                                     └─ app_home_opened → views.publish
//! ```
//!
//! Every stage returns `Result<_, HandlerError>`; `EventHandler::handle` is
//! the only place errors become a 400 response.

pub mod eligibility;
pub mod handler;
pub mod home;
pub mod types;

use thiserror::Error;

use crate::slack::SlackError;

pub use eligibility::{check_message, Eligibility};
pub use handler::EventHandler;
pub use home::render_home;
pub use types::{EventPayload, InboundRequest, InnerEvent, Payload, ResponseEnvelope};

/// Every way a request can fail. All of them map to a 400 response.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Unsupported method \"{0}\"")]
    UnsupportedMethod(String),

    #[error("Unsupported type \"{0}\"")]
    UnsupportedType(String),

    #[error("Unverified signature. Does this message have required metadata from Slack? Have secrets been exported?")]
    VerificationFailed,

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("event_callback payload has no event")]
    MissingEvent,

    #[error(transparent)]
    Downstream(#[from] SlackError),
}
