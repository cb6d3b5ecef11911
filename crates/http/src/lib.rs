//! A transport that talks to the AI service over HTTP.

#[macro_use]
extern crate tracing;

mod config;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use ai_desk_api::{ApiRequest, ErrorKind, Method, Transport, TransportError};
use mime::Mime;
use reqwest::{Client, header};
use serde_json::Value;

pub use config::{
    DEFAULT_API_KEY, DEFAULT_BASE_URL, HttpConfig, HttpConfigBuilder,
};

/// Name of the header carrying the shared credential.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Error type for [`HttpTransport`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
    status: Option<u16>,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
            status: None,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status the service answered with, if it answered.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl TransportError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// HTTP transport for the AI service.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    config: Arc<HttpConfig>,
}

impl HttpTransport {
    /// Creates a new `HttpTransport` with the given configuration.
    #[inline]
    pub fn new(config: HttpConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Returns the configuration of this transport.
    #[inline]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

impl Transport for HttpTransport {
    type Error = Error;

    fn send(
        &self,
        req: &ApiRequest,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send + 'static {
        let url = format!("{}{}", self.config.base_url, req.endpoint);
        let mut builder = match req.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        }
        .header(API_KEY_HEADER, self.config.api_key.as_str());
        if let Some(payload) = &req.payload {
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .json(payload);
        }
        let resp_fut = builder.send();
        let endpoint = req.endpoint.clone();

        async move {
            let resp = match resp_fut.await {
                Ok(resp) => resp,
                Err(err) => {
                    return Err(Error::new(
                        format!("{err}"),
                        ErrorKind::Network,
                    ));
                }
            };

            let status = resp.status();
            if !status.is_success() {
                let mut err = Error::new(
                    format!("{endpoint} responded with {status}"),
                    ErrorKind::Unavailable,
                );
                err.status = Some(status.as_u16());
                return Err(err);
            }

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());
            let is_json = content_type
                .and_then(|v| v.parse().ok())
                .map(|m: Mime| m.subtype().as_str() == "json")
                .unwrap_or(false);
            if !is_json {
                // The body decides: it fails as `Network` only if it
                // doesn't parse as JSON.
                debug!(
                    "content type {content_type:?} is not JSON, \
                     decoding the body anyway"
                );
            }

            resp.json::<Value>().await.map_err(|err| {
                Error::new(
                    format!("invalid response body: {err}"),
                    ErrorKind::Network,
                )
            })
        }
    }
}
