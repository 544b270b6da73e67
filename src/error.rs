//! Unified error type.

use std::fmt;
use std::net::SocketAddr;

/// The error type returned by sceneprobe's fallible operations.
///
/// Request-level outcomes (404, 501, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s, and never leave
/// the connection task. This type surfaces infrastructure failures only.
#[derive(Debug)]
pub enum Error {
    /// The listening socket could not be bound. The server does not start.
    Bind { addr: SocketAddr, source: std::io::Error },
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { addr, source } => write!(f, "bind {addr}: {source}"),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind { source, .. } => Some(source),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
