mod builder;
mod state;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde_json::json;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::api_client::CHAT_ENDPOINT;
use crate::transcript::{Message, Transcript};
pub use builder::ChatBuilder;
use state::Shared;

/// Shown once, shortly after the chat is created.
pub const WELCOME_MESSAGE: &str =
    "Hello! I'm your AI Chatbot. How can I assist you today?";
/// The only message left after clearing the transcript.
pub const CLEARED_MESSAGE: &str =
    "Conversation cleared. How else can I help you?";
/// Shown when the service answers without a usable `message`.
pub const CHAT_FALLBACK_REPLY: &str = "I received your message!";
/// Shown when the service answers with a non-success status.
pub const CHAT_UNAVAILABLE: &str =
    "Error: Could not connect to the AI service (Unauthorized or Unavailable).";
/// Shown when the request could not complete.
pub const CHAT_NETWORK_FAILURE: &str = "Error: Failed to fetch response.";

/// Where the chat is in its request cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChatStage {
    /// No request is in flight.
    #[default]
    Idle,
    /// At least one submitted message is waiting for its reply.
    AwaitingResponse,
}

/// A turn-based chat, like a window that displays messages and has an
/// input box.
///
/// Every submission is sent right away, even if earlier ones are still
/// waiting. Replies are appended in the order they arrive, which is not
/// necessarily the order of submission.
///
/// Cloning a `Chat` gives another handle to the same transcript.
#[derive(Clone)]
pub struct Chat {
    shared: Arc<Shared>,
}

impl Chat {
    /// Submits the text in the input box.
    ///
    /// Surrounding whitespace is trimmed. If nothing is left, this does
    /// nothing and returns `None`. Otherwise the user message is appended
    /// before this method returns, and the returned task appends the
    /// reply once the service answers.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn submit(&self, input: &str) -> Option<JoinHandle<()>> {
        let text = input.trim();
        if text.is_empty() {
            trace!("ignored empty input");
            return None;
        }

        self.shared.begin_request(Message::user(text));
        let reply_fut = self
            .shared
            .client
            .post(CHAT_ENDPOINT, json!({ "message": text }));

        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(
            async move {
                let reply = match reply_fut.await {
                    Ok(body) => state::reply_text(&body),
                    Err(err) => state::failure_text(err.kind()),
                };
                shared.finish_request(Message::assistant(reply));
            }
            .instrument(trace_span!("chat reply")),
        );
        Some(task)
    }

    /// Empties the transcript and leaves a single greeting in it.
    ///
    /// Requests in flight are not affected, their replies still land in
    /// the cleared transcript.
    pub fn clear(&self) {
        self.shared.clear();
    }

    /// Returns a snapshot of the transcript.
    #[inline]
    pub fn transcript(&self) -> Transcript {
        self.shared.lock().transcript.clone()
    }

    /// Returns the current stage.
    #[inline]
    pub fn stage(&self) -> ChatStage {
        if self.shared.lock().in_flight > 0 {
            ChatStage::AwaitingResponse
        } else {
            ChatStage::Idle
        }
    }
}
