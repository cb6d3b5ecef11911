use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::pin::Pin;
use std::sync::Arc;

use ai_desk_api::{ApiRequest, ErrorKind, Transport, TransportError};
use serde::Deserialize;
use serde_json::Value;
use tracing::Instrument;

/// Where chat messages are sent.
pub const CHAT_ENDPOINT: &str = "/api/ai/chatbot";
/// Where generation prompts are sent.
pub const GENERATE_ENDPOINT: &str = "/api/ai/generator";
/// Liveness probe of the service.
pub const HEALTH_ENDPOINT: &str = "/api/health";

type RequestResult = Result<Value, Box<dyn TransportError>>;
type BoxedRequestFuture = Pin<Box<dyn Future<Output = RequestResult> + Send>>;
type HandlerFn = Arc<dyn Fn(ApiRequest) -> BoxedRequestFuture + Send + Sync>;

/// A wrapper around a transport that provides a type-erased interface
/// for the widgets.
///
/// Every call is independent: there is no retry, no queuing and no
/// de-duplication, and nothing stops a second call from starting before
/// the first one resolves.
#[derive(Clone)]
pub struct ApiClient {
    handler_fn: HandlerFn,
}

impl ApiClient {
    /// Creates a client on top of `transport`.
    #[inline]
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        // We have to erase the type `T`, since the widgets don't have a
        // generic parameter and we don't want them either.
        let handler_fn: HandlerFn =
            Arc::new(move |req: ApiRequest| -> BoxedRequestFuture {
                let fut = transport.send(&req);
                let span =
                    trace_span!("api request", endpoint = %req.endpoint);
                Box::pin(
                    async move {
                        trace!("sent: {:?}", req);
                        match fut.await {
                            Ok(body) => {
                                trace!("got a body: {body}");
                                Ok(body)
                            }
                            Err(err) => {
                                error!(
                                    "request failed ({}): {err}",
                                    err.kind()
                                );
                                Err(Box::new(err) as Box<dyn TransportError>)
                            }
                        }
                    }
                    .instrument(span),
                )
            });
        Self { handler_fn }
    }

    /// Posts `payload` as JSON to `endpoint`.
    ///
    /// The request is built and given to the transport before this method
    /// returns. Whether anything goes out on the wire before the returned
    /// future is polled depends on the transport. The HTTP one only
    /// connects once it is.
    #[inline]
    pub fn post(
        &self,
        endpoint: &str,
        payload: Value,
    ) -> impl Future<Output = RequestResult> + Send + 'static {
        (self.handler_fn)(ApiRequest::post(endpoint, payload))
    }

    /// Reads `endpoint` without a body.
    #[inline]
    pub fn get(
        &self,
        endpoint: &str,
    ) -> impl Future<Output = RequestResult> + Send + 'static {
        (self.handler_fn)(ApiRequest::get(endpoint))
    }

    /// Probes the service health.
    pub async fn health(
        &self,
    ) -> Result<HealthStatus, Box<dyn TransportError>> {
        let body = self.get(HEALTH_ENDPOINT).await?;
        serde_json::from_value(body).map_err(|err| {
            error!("unexpected health body: {err}");
            Box::new(DecodeError(err.to_string())) as Box<dyn TransportError>
        })
    }
}

/// What the service reports about itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    /// `healthy` when the service is up.
    pub status: String,
    /// Human-readable service name.
    pub service: String,
    /// Whether the upstream model is configured.
    pub gemini_ready: bool,
    /// Models the upstream account can use.
    pub available_models: Vec<String>,
}

#[derive(Debug)]
struct DecodeError(String);

impl Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid response body: {}", self.0)
    }
}

impl StdError for DecodeError {}

impl TransportError for DecodeError {
    #[inline]
    fn kind(&self) -> ErrorKind {
        ErrorKind::Network
    }
}
