//! Suggestion Bot - Slack channel suggestions from volunteer introductions.
//!
//! The `suggestion-bot` binary serves a single Slack Events API endpoint that:
//! - Echoes the `url_verification` challenge during app setup
//! - Verifies signed `event_callback` requests
//! - Replies to introductions in the target channel with matching channels
//! - Publishes the app's home tab when a user opens it
//!
//! ## Architecture
//!
//! ```text
//! Slack → web (axum) → events::EventHandler → suggest::SuggestionDispatcher → Slack Web API
//!                                           └→ events::home → views.publish
//! ```

pub mod config;
pub mod events;
pub mod slack;
pub mod suggest;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use events::{EventHandler, HandlerError, InboundRequest, ResponseEnvelope};
pub use slack::{SlackApi, SlackClient, SlackError};
pub use suggest::{Suggester, SuggestionDispatcher};
pub use web::AppState;
