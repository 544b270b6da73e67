//! HTTP method as a typed enum.
//!
//! sceneprobe answers exactly two verbs. Everything else collapses into
//! [`Method::Unsupported`] and is answered with `501 Not Implemented` before
//! routing ever sees it.

use std::fmt;

/// The method of an incoming request, as far as sceneprobe cares.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Get,
    Head,
    Unsupported,
}

impl Method {
    /// Classifies a raw request line by its prefix.
    ///
    /// Matching is a case-sensitive prefix test: `"GET /x HTTP/1.0"` is
    /// [`Method::Get`], `"HEAD / HTTP/1.0"` is [`Method::Head`], anything
    /// else (including `"get ..."` and the empty line) is unsupported.
    pub fn classify(line: &str) -> Self {
        if line.starts_with("GET") {
            Self::Get
        } else if line.starts_with("HEAD") {
            Self::Head
        } else {
            Self::Unsupported
        }
    }

    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get         => "GET",
            Self::Head        => "HEAD",
            Self::Unsupported => "UNSUPPORTED",
        }
    }

    /// Whether a reply to this method carries a body.
    pub fn sends_body(self) -> bool {
        matches!(self, Self::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
