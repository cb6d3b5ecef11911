use std::sync::{Arc, Mutex};
use std::time::Duration;

use ai_desk_api::Transport;
use tokio::time::sleep;

use super::state::{MessageFn, NotifyFn, Shared};
use super::{Chat, WELCOME_MESSAGE};
use crate::api_client::ApiClient;
use crate::transcript::Message;

const DEFAULT_WELCOME_DELAY: Duration = Duration::from_millis(500);

/// [`Chat`] builder.
pub struct ChatBuilder {
    client: ApiClient,
    welcome_delay: Duration,
    on_message: Option<MessageFn>,
    on_clear: Option<NotifyFn>,
    on_idle: Option<NotifyFn>,
}

impl ChatBuilder {
    /// Creates a new builder with the specified transport.
    #[inline]
    pub fn with_transport<T: Transport + 'static>(transport: T) -> Self {
        Self::with_client(ApiClient::new(transport))
    }

    /// Creates a new builder sharing an existing client.
    #[inline]
    pub fn with_client(client: ApiClient) -> Self {
        Self {
            client,
            welcome_delay: DEFAULT_WELCOME_DELAY,
            on_message: None,
            on_clear: None,
            on_idle: None,
        }
    }

    /// Sets how long to wait before the welcome message shows up.
    #[inline]
    pub fn with_welcome_delay(mut self, delay: Duration) -> Self {
        self.welcome_delay = delay;
        self
    }

    /// Attaches a callback to be invoked for every appended message.
    #[inline]
    pub fn on_message(
        mut self,
        on_message: impl Fn(&Message) + Send + Sync + 'static,
    ) -> Self {
        self.on_message = Some(Box::new(on_message));
        self
    }

    /// Attaches a callback to be invoked when the transcript is cleared,
    /// right before the greeting is appended.
    #[inline]
    pub fn on_clear(
        mut self,
        on_clear: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_clear = Some(Box::new(on_clear));
        self
    }

    /// Attaches a callback to be invoked when the last request in flight
    /// has been answered.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds the chat and schedules its welcome message.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn build(self) -> Chat {
        let Self {
            client,
            welcome_delay,
            on_message,
            on_clear,
            on_idle,
        } = self;

        let shared = Arc::new(Shared {
            client,
            state: Mutex::new(Default::default()),
            on_message,
            on_clear,
            on_idle,
        });

        // The chat may be gone by the time the greeting is due.
        let weak = Arc::downgrade(&shared);
        tokio::spawn(async move {
            sleep(welcome_delay).await;
            if let Some(shared) = weak.upgrade() {
                shared.append(Message::assistant(WELCOME_MESSAGE));
            }
        });

        Chat { shared }
    }
}
