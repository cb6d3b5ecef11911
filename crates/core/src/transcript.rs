//! Transcript-related types.

/// Who wrote a [`Message`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Typed by the user.
    User,
    /// Produced by the service, or a fixed text shown in its place.
    Assistant,
}

/// A message in the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Message {
    text: String,
    origin: Origin,
}

impl Message {
    /// Creates a message typed by the user.
    #[inline]
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            origin: Origin::User,
        }
    }

    /// Creates a message shown on behalf of the assistant.
    #[inline]
    pub fn assistant<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            origin: Origin::Assistant,
        }
    }

    /// Returns the text of this message.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns who wrote this message.
    #[inline]
    pub fn origin(&self) -> Origin {
        self.origin
    }
}

/// An append-only sequence of messages.
///
/// Messages are never edited or removed one by one. The only way to get
/// rid of them is clearing the whole transcript.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Transcript {
    pub(crate) items: Vec<Message>,
}

impl Transcript {
    /// Returns the messages in the order they were appended.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.items
    }

    /// Returns the most recent message.
    #[inline]
    pub fn last(&self) -> Option<&Message> {
        self.items.last()
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no messages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub(crate) fn push(&mut self, msg: Message) {
        self.items.push(msg);
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}
