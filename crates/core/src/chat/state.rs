use std::sync::{Mutex, MutexGuard};

use ai_desk_api::ErrorKind;
use serde_json::Value;

use super::{
    CHAT_FALLBACK_REPLY, CHAT_NETWORK_FAILURE, CHAT_UNAVAILABLE,
    CLEARED_MESSAGE,
};
use crate::api_client::ApiClient;
use crate::transcript::{Message, Transcript};

pub(crate) type MessageFn = Box<dyn Fn(&Message) + Send + Sync>;
pub(crate) type NotifyFn = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
pub struct ChatState {
    pub transcript: Transcript,
    pub in_flight: usize,
}

/// Everything a chat and its reply tasks share.
///
/// The lock is never held while calling back into user code, so the
/// callbacks are free to read the chat again.
pub struct Shared {
    pub client: ApiClient,
    pub state: Mutex<ChatState>,
    pub on_message: Option<MessageFn>,
    pub on_clear: Option<NotifyFn>,
    pub on_idle: Option<NotifyFn>,
}

impl Shared {
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn append(&self, msg: Message) {
        self.lock().transcript.push(msg.clone());
        self.notify_message(&msg);
    }

    pub fn begin_request(&self, msg: Message) {
        {
            let mut state = self.lock();
            state.transcript.push(msg.clone());
            state.in_flight += 1;
        }
        self.notify_message(&msg);
    }

    pub fn finish_request(&self, reply: Message) {
        let idle = {
            let mut state = self.lock();
            state.transcript.push(reply.clone());
            state.in_flight = state.in_flight.saturating_sub(1);
            state.in_flight == 0
        };
        self.notify_message(&reply);
        if idle {
            if let Some(on_idle) = &self.on_idle {
                on_idle();
            }
        }
    }

    pub fn clear(&self) {
        let greeting = Message::assistant(CLEARED_MESSAGE);
        {
            let mut state = self.lock();
            state.transcript.clear();
            state.transcript.push(greeting.clone());
        }
        if let Some(on_clear) = &self.on_clear {
            on_clear();
        }
        self.notify_message(&greeting);
    }

    #[inline]
    fn notify_message(&self, msg: &Message) {
        if let Some(on_message) = &self.on_message {
            on_message(msg);
        }
    }
}

/// Picks the text to show for a successful reply.
pub fn reply_text(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(CHAT_FALLBACK_REPLY)
        .to_owned()
}

#[inline]
pub fn failure_text(kind: ErrorKind) -> String {
    match kind {
        ErrorKind::Unavailable => CHAT_UNAVAILABLE,
        ErrorKind::Network => CHAT_NETWORK_FAILURE,
    }
    .to_owned()
}
