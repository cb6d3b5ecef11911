//! Terminal host for the AI service widgets.
//!
//! The crate includes a CLI tool for using in the terminal. And you can
//! also use it as a library to put the chat and the generator into your
//! own host apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod surface;

use ai_desk_core::ApiClient;
use ai_desk_http::{HttpConfig, HttpTransport};

/// Re-exports of [`ai_desk_api`] crate.
pub mod api {
    pub use ai_desk_api::*;
}

/// Re-exports of [`ai_desk_core`] crate.
pub mod core {
    pub use ai_desk_core::*;
}

/// Re-exports of [`ai_desk_http`] crate.
pub mod http {
    pub use ai_desk_http::*;
}

/// Creates a client that talks to the service described by `config`.
///
/// The chat and the generator can share the returned client, see
/// [`ChatBuilder::with_client`](ai_desk_core::ChatBuilder::with_client).
#[inline]
pub fn connect(config: HttpConfig) -> ApiClient {
    debug!("connecting to {}", config.base_url());
    ApiClient::new(HttpTransport::new(config))
}
