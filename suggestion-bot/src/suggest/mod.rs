//! Channel suggestion module.
//!
//! ```text
//! message text → Suggester::suggest() → reply_text() → chat.postMessage (threaded)
//! ```

pub mod dispatcher;
pub mod keywords;

pub use dispatcher::{DispatchOutcome, SuggestionDispatcher};
pub use keywords::{is_matchable, reply_text, Suggester, Suggestion, DEFAULT_KEYWORDS};
