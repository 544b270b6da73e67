//! Outgoing HTTP response type and the header builder.
//!
//! Every reply sceneprobe writes has the same shape: an `HTTP/1.0` status
//! line, `Connection: close`, the server token, a content type, a blank
//! line, and (for `GET` only) the body.

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::method::Method;
use crate::status::{Status, reason_phrase};

/// Value of the `Server` header on every reply.
pub const SERVER_TOKEN: &str = concat!("sceneprobe/", env!("CARGO_PKG_VERSION"));

// ── FileType ──────────────────────────────────────────────────────────────────

/// Coarse content classification used to pick the `Content-Type` header.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FileType {
    #[default]
    Html,    // text/html
    Jpeg,    // image/jpeg
    Gif,     // image/gif
    Archive, // application/x-zip-compressed
}

impl FileType {
    /// Derives the hint from a path's file extension.
    ///
    /// `.zip`, `.exe` and `.tar` are archives, `.jpg`/`.jpeg` are JPEG,
    /// `.gif` is GIF. Anything else is HTML.
    ///
    /// ```rust
    /// use sceneprobe::FileType;
    ///
    /// assert_eq!(FileType::from_path("textures/brick.jpg"), FileType::Jpeg);
    /// assert_eq!(FileType::from_path("client.html"), FileType::Html);
    /// ```
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(".zip") || path.ends_with(".exe") || path.ends_with(".tar") {
            Self::Archive
        } else if path.ends_with(".jpg") || path.ends_with(".jpeg") {
            Self::Jpeg
        } else if path.ends_with(".gif") {
            Self::Gif
        } else {
            Self::Html
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Html    => "text/html",
            Self::Jpeg    => "image/jpeg",
            Self::Gif     => "image/gif",
            Self::Archive => "application/x-zip-compressed",
        }
    }
}

/// Renders the status line and headers for a reply, including the blank
/// line that ends the header block.
///
/// Codes outside the known table get an empty reason phrase.
pub fn build_header(status: u16, file_type: FileType) -> Vec<u8> {
    format!(
        "HTTP/1.0 {status} {reason}\r\n\
         Connection: close\r\n\
         Server: {SERVER_TOKEN}\r\n\
         Content-Type: {content_type}\r\n\
         \r\n",
        reason = reason_phrase(status),
        content_type = file_type.content_type(),
    )
    .into_bytes()
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use sceneprobe::{FileType, Response, Status};
///
/// Response::html("<b>hi</b>");
/// Response::asset(FileType::Gif, b"GIF89a".to_vec());
/// Response::status(Status::NotFound);
/// ```
#[derive(Clone, Debug)]
pub struct Response {
    pub(crate) status: u16,
    pub(crate) file_type: FileType,
    pub(crate) body: Bytes,
}

impl Response {
    /// `200 OK` — `text/html`.
    pub fn html(body: impl Into<String>) -> Self {
        let body: String = body.into();
        Self::asset(FileType::Html, body)
    }

    /// `200 OK` with the content type of `file_type`.
    pub fn asset(file_type: FileType, body: impl Into<Bytes>) -> Self {
        Self { status: Status::Ok.into(), file_type, body: body.into() }
    }

    /// Response with no body.
    pub fn status(code: Status) -> Self {
        Self { status: code.into(), file_type: FileType::Html, body: Bytes::new() }
    }

    pub fn status_code(&self) -> u16 { self.status }
    pub fn file_type(&self) -> FileType { self.file_type }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Writes the header and, when `method` is `GET`, the body.
    ///
    /// A `HEAD` reply never carries body bytes even when one is available.
    pub(crate) async fn write_to<W: AsyncWrite + Unpin>(
        self,
        writer: &mut W,
        method: Method,
    ) -> std::io::Result<()> {
        writer.write_all(&build_header(self.status, self.file_type)).await?;
        if method.sends_body() && !self.body.is_empty() {
            writer.write_all(&self.body).await?;
        }
        writer.flush().await
    }
}
