//! Deciding whether a message gets a suggestion reply.

use super::types::InnerEvent;

/// Outcome of the eligibility check, with the first failing reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    /// Posted outside the target channel
    WrongChannel,
    /// Authored by a bot, this app included
    FromBot,
    /// No `client_msg_id`: edits, joins and other system messages
    NotUserAuthored,
    /// A reply inside someone else's thread
    ThreadReply,
}

impl Eligibility {
    pub fn is_eligible(self) -> bool {
        self == Eligibility::Eligible
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Eligibility::Eligible => "eligible",
            Eligibility::WrongChannel => "wrong_channel",
            Eligibility::FromBot => "from_bot",
            Eligibility::NotUserAuthored => "not_user_authored",
            Eligibility::ThreadReply => "thread_reply",
        }
    }
}

/// Check a `message` event against the reply policy.
///
/// A thread-starting message carries `thread_ts == ts` and still qualifies.
pub fn check_message(event: &InnerEvent, target_channel: &str) -> Eligibility {
    if event.channel.as_deref() != Some(target_channel) {
        return Eligibility::WrongChannel;
    }

    if event.bot_id.is_some() {
        return Eligibility::FromBot;
    }

    if event.client_msg_id.is_none() {
        return Eligibility::NotUserAuthored;
    }

    match &event.thread_ts {
        Some(thread_ts) if event.ts.as_ref() != Some(thread_ts) => Eligibility::ThreadReply,
        _ => Eligibility::Eligible,
    }
}
