//! Incoming HTTP request type and the request-line parser.
//!
//! sceneprobe speaks a tiny HTTP/1.0 subset: it reads one request line,
//! skips whatever headers follow, and never reads a body.

use std::fmt;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tokio::time::timeout;
use tracing::debug;

use crate::method::Method;

/// Upper bound on header lines consumed after the request line.
pub(crate) const MAX_HEADER_LINES: usize = 64;

/// An incoming request, parsed from its request line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request {
    method: Method,
    segments: Vec<String>,
}

impl Request {
    /// Parses a request line such as `GET /scenes/root HTTP/1.0`.
    ///
    /// The method is classified first; an unsupported method short-circuits
    /// with no path. For `GET`/`HEAD` the path is the token between the
    /// first and second space, so a line without two spaces is malformed.
    /// The version token is ignored.
    ///
    /// ```rust
    /// use sceneprobe::{Method, Request};
    ///
    /// let req = Request::parse("GET /scenes/root/transform HTTP/1.0").unwrap();
    /// assert_eq!(req.method(), Method::Get);
    /// assert_eq!(req.segments(), ["scenes", "root", "transform"]);
    /// ```
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let method = Method::classify(line);
        if method == Method::Unsupported {
            return Ok(Self { method, segments: Vec::new() });
        }

        let mut tokens = line.splitn(3, ' ');
        let (Some(_), Some(target), Some(_)) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(ParseError::Malformed(line.to_owned()));
        };

        Ok(Self { method, segments: split_segments(target) })
    }

    pub fn method(&self) -> Method { self.method }
    pub fn segments(&self) -> &[String] { &self.segments }

    /// The normalized path: segments joined by `/`, no leading slash.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }
}

/// Splits a raw request path into its segments.
///
/// Leading, trailing and repeated slashes produce no empty segments.
/// Segments are kept verbatim: no percent-decoding, no query stripping.
///
/// ```rust
/// use sceneprobe::split_segments;
///
/// assert!(split_segments("/").is_empty());
/// assert_eq!(split_segments("//scenes///root/"), ["scenes", "root"]);
/// ```
pub fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

// ── ParseError ────────────────────────────────────────────────────────────────

/// Why a request head could not be turned into a [`Request`].
#[derive(Debug)]
pub enum ParseError {
    /// The peer closed the connection before sending a byte.
    Eof,
    /// The request line lacks a path token.
    Malformed(String),
    /// The request line exceeded the configured limit.
    TooLong,
    /// The peer sent nothing before the read timeout.
    Timeout,
    /// The peer sent part of a request line, then stalled past the read timeout.
    Incomplete(String),
    Io(std::io::Error),
}

impl ParseError {
    /// Whether the peer sent enough to deserve a reply.
    ///
    /// Malformed, oversized and half-sent lines get the same `501` as an
    /// unsupported method. EOF, silent peers and socket errors leave nothing
    /// to answer.
    pub fn is_answerable(&self) -> bool {
        matches!(self, Self::Malformed(_) | Self::TooLong | Self::Incomplete(_))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eof          => f.write_str("connection closed before request line"),
            Self::Malformed(l) => write!(f, "malformed request line: {l:?}"),
            Self::TooLong      => f.write_str("request line too long"),
            Self::Timeout      => f.write_str("timed out waiting for request"),
            Self::Incomplete(l) => write!(f, "request line incomplete: {l:?}"),
            Self::Io(e)        => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ── Reading from the wire ─────────────────────────────────────────────────────

/// Reads the request line and discards the header block behind it.
///
/// `line_timeout` bounds the request line alone. Headers are then skipped
/// for at most `header_timeout` so that closing the socket after the reply
/// does not reset a connection the client is still writing to; a client that
/// never sends the blank line still gets its answer once that bound expires.
pub(crate) async fn read_head<R>(
    reader: &mut R,
    max_line: usize,
    line_timeout: Duration,
    header_timeout: Duration,
) -> Result<String, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let read = timeout(line_timeout, fill_line(reader, &mut buf, max_line)).await;
    let line = match read {
        Ok(Ok(0)) => return Err(ParseError::Eof),
        Ok(Ok(_)) => finish_line(buf, max_line)?,
        Ok(Err(e)) => return Err(e.into()),
        Err(_) if buf.is_empty() => return Err(ParseError::Timeout),
        Err(_) => return Err(ParseError::Incomplete(String::from_utf8_lossy(&buf).into_owned())),
    };

    let skip_headers = async {
        for _ in 0..MAX_HEADER_LINES {
            let mut header = Vec::new();
            let done = match fill_line(reader, &mut header, max_line).await {
                Ok(0) | Err(_) => true,
                Ok(_) => header.iter().all(|b| matches!(b, b'\r' | b'\n')),
            };
            if done {
                break;
            }
        }
    };
    if timeout(header_timeout, skip_headers).await.is_err() {
        debug!("header block not terminated, answering anyway");
    }

    Ok(line)
}

/// Appends one line, `\n` included, to `buf`.
///
/// Reads at most `max_line` bytes plus a `\r\n`. Bytes already received stay
/// in `buf` when the future is dropped, so a timeout can tell a silent peer
/// from one that stalled mid-line.
async fn fill_line<R>(reader: &mut R, buf: &mut Vec<u8>, max_line: usize) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let limit = u64::try_from(max_line).unwrap_or(u64::MAX).saturating_add(2);
    (&mut *reader).take(limit).read_until(b'\n', buf).await
}

/// Strips the line ending and enforces the length limit on what is left.
///
/// A final line without a newline is accepted as-is.
fn finish_line(mut buf: Vec<u8>, max_line: usize) -> Result<String, ParseError> {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    if buf.len() > max_line {
        return Err(ParseError::TooLong);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
