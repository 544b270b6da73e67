//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Port the diagnostic server listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 4444;

/// Listener settings and per-connection limits.
///
/// ```rust
/// use std::time::Duration;
/// use sceneprobe::ServerConfig;
///
/// let config = ServerConfig::default()
///     .port(8080)
///     .read_timeout(Duration::from_secs(2));
/// assert_eq!(config.listen_addr().port(), 8080);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ServerConfig {
    addr: SocketAddr,
    read_timeout: Duration,
    header_timeout: Duration,
    write_timeout: Duration,
    max_request_line: usize,
}

impl Default for ServerConfig {
    /// All interfaces on port 4444, 5 s to send the request line, 500 ms to
    /// finish the headers, 10 s to drain the reply, 8 KiB request lines.
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            read_timeout: Duration::from_secs(5),
            header_timeout: Duration::from_millis(500),
            write_timeout: Duration::from_secs(10),
            max_request_line: 8 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    /// Keeps the interface, replaces the port.
    pub fn port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// How long to keep skimming headers once the request line is in.
    ///
    /// When it runs out the request is answered anyway.
    pub fn header_timeout(mut self, timeout: Duration) -> Self {
        self.header_timeout = timeout;
        self
    }

    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    pub fn max_request_line(mut self, bytes: usize) -> Self {
        self.max_request_line = bytes;
        self
    }

    pub fn listen_addr(&self) -> SocketAddr { self.addr }
    pub fn request_read_timeout(&self) -> Duration { self.read_timeout }
    /// The header timeout, never longer than the read timeout.
    pub fn header_drain_timeout(&self) -> Duration { self.header_timeout.min(self.read_timeout) }
    pub fn response_write_timeout(&self) -> Duration { self.write_timeout }
    pub fn request_line_limit(&self) -> usize { self.max_request_line }
}
