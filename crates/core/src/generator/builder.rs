use std::sync::{Arc, Mutex};

use ai_desk_api::Transport;

use super::{ChangeFn, Generator, Shared};
use crate::api_client::ApiClient;
use crate::generator::GeneratorView;

/// [`Generator`] builder.
pub struct GeneratorBuilder {
    client: ApiClient,
    on_change: Option<ChangeFn>,
}

impl GeneratorBuilder {
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
            on_change: None,
        }
    }

    /// Attaches a callback to be invoked after every change of the view.
    #[inline]
    pub fn on_change(
        mut self,
        on_change: impl Fn(&GeneratorView) + Send + Sync + 'static,
    ) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    /// Builds the generator.
    #[inline]
    pub fn build(self) -> Generator {
        let shared = Shared {
            client: self.client,
            state: Mutex::new(Default::default()),
            on_change: self.on_change,
        };
        Generator {
            shared: Arc::new(shared),
        }
    }
}
