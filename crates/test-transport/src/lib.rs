//! A scripted fake service for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::pending;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use ai_desk_api::{ApiRequest, ErrorKind, Transport, TransportError};
use serde_json::Value;
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    #[allow(dead_code)]
    message: String,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl TransportError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Script {
    replies: VecDeque<PresetReply>,
    requests: Vec<ApiRequest>,
}

/// A local fake service for testing purpose.
///
/// Before sending requests, you need to queue the replies, one per
/// request, in the order the requests will be sent. Every request is
/// recorded so that tests can inspect what reached the "service". If
/// there are no replies left, the request fails as `Unavailable`.
///
/// Clones share the same script.
///
/// # Note
///
/// This type is not optimized for production use. You should only use
/// it for testing.
#[derive(Clone, Default)]
pub struct TestTransport {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl TestTransport {
    /// Creates a transport that answers with `replies` in order.
    pub fn with_replies(
        replies: impl IntoIterator<Item = PresetReply>,
    ) -> Self {
        let transport = Self::default();
        for reply in replies {
            transport.push_reply(reply);
        }
        transport
    }

    #[inline]
    pub fn push_reply(&self, reply: PresetReply) {
        self.lock().replies.push_back(reply);
    }

    /// Every reply will wait `duration` before being delivered.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns the requests received so far.
    #[inline]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    #[inline]
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        // A panicking test thread must not hide the script from others.
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Transport for TestTransport {
    type Error = crate::Error;

    fn send(
        &self,
        req: &ApiRequest,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send + 'static {
        let reply = {
            let mut script = self.lock();
            script.requests.push(req.clone());
            script.replies.pop_front()
        };
        let delay = self.delay.unwrap_or(Duration::from_millis(1));

        async move {
            sleep(delay).await;
            match reply {
                Some(PresetReply::Json(body)) => Ok(body),
                Some(PresetReply::Status(status)) => Err(Error {
                    message: format!("responded with status {status}"),
                    kind: ErrorKind::Unavailable,
                }),
                Some(PresetReply::NetworkFailure) => Err(Error {
                    message: "connection reset".to_owned(),
                    kind: ErrorKind::Network,
                }),
                Some(PresetReply::Hang) => pending().await,
                None => Err(Error {
                    message: "no enough replies".to_owned(),
                    kind: ErrorKind::Unavailable,
                }),
            }
        }
    }
}
