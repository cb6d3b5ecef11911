use std::error::Error;

use serde_json::Value;

use crate::error::ErrorKind;
use crate::request::ApiRequest;

/// The error type for a transport.
pub trait TransportError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that carries [`ApiRequest`]s to the AI service and brings back
/// the parsed JSON body.
///
/// Once the transport is created, it should behave like a stateless
/// object. It can still have internal state, but callers should not rely
/// on it, and the transport should be prepared for being dropped anytime.
///
/// Implementations must attach the service credential to every request,
/// and must not retry, queue, or de-duplicate requests on their own.
pub trait Transport: Send + Sync {
    /// The error type that may be returned by the transport.
    type Error: TransportError;

    /// Sends a request to the service.
    ///
    /// The returned future must be fully independent of `self`, so that
    /// several requests can be in flight at the same time.
    fn send(
        &self,
        req: &ApiRequest,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send + 'static;
}
