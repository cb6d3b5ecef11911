use std::fmt::{self, Display};

/// The kind of error that occurred.
///
/// The kinds only decide which fixed message is shown to the user and
/// how the failure is logged. No kind carries structured detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The service answered with a non-success status. Usually the API
    /// key was rejected or the service is down.
    Unavailable,
    /// The request could not complete: DNS, connection, timeout, or a
    /// response body that could not be read as JSON.
    Network,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Unavailable => write!(f, "unauthorized or unavailable"),
            ErrorKind::Network => write!(f, "network failure"),
        }
    }
}
