//! Core logic of the chat and generator widgets, and the client they
//! share to reach the AI service.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod api_client;
mod chat;
mod generator;
pub mod surface;
pub mod transcript;

pub use api_client::{
    ApiClient, CHAT_ENDPOINT, GENERATE_ENDPOINT, HEALTH_ENDPOINT,
    HealthStatus,
};
pub use chat::{Chat, ChatBuilder, ChatStage};
pub use generator::{
    Control, Generator, GeneratorBuilder, GeneratorStage, GeneratorView,
};

/// Fixed texts the widgets render.
pub mod text {
    pub use crate::chat::{
        CHAT_FALLBACK_REPLY, CHAT_NETWORK_FAILURE, CHAT_UNAVAILABLE,
        CLEARED_MESSAGE, WELCOME_MESSAGE,
    };
    pub use crate::generator::{
        COPIED_LABEL, COPY_LABEL, DOWNLOAD_FILENAME, GENERATE_FALLBACK,
        GENERATE_NETWORK_FAILURE, GENERATE_UNAVAILABLE, GENERATING_LABEL,
        PLACEHOLDER, TRIGGER_LABEL,
    };
}
