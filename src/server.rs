//! Listener, accept loop and per-connection handling.
//!
//! # Lifecycle
//!
//! The host constructs the server once at startup:
//!
//! 1. [`Server::bind`] opens the listening socket. Failure is fatal: it is
//!    logged and returned, and there is no retry.
//! 2. [`Server::serve`] accepts connections until the process exits. Each
//!    connection runs in its own task, so a slow client never holds up the
//!    listener.
//! 3. [`Server::serve_with_shutdown`] does the same but stops accepting when
//!    the given future resolves, then waits for in-flight connections.
//!
//! # One connection
//!
//! Read the request line (bounded by the read timeout) and skim the headers
//! (bounded by the header timeout), route, write one reply (bounded by the
//! write timeout), close. Whatever goes wrong stays
//! inside the connection task: it is logged and the accept loop carries on.

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::Arc;

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::Error;
use crate::method::Method;
use crate::request::{ParseError, Request, read_head};
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;

/// The diagnostic HTTP server.
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    /// Binds the listening socket described by `config`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn run() -> Result<(), sceneprobe::Error> {
    /// use sceneprobe::{Server, ServerConfig};
    /// let server = Server::bind(ServerConfig::default().port(4444)).await?;
    /// # Ok(()) }
    /// ```
    pub async fn bind(config: ServerConfig) -> Result<Self, Error> {
        let addr = config.listen_addr();
        match TcpListener::bind(addr).await {
            Ok(listener) => Ok(Self { listener, config }),
            Err(source) => {
                error!(%addr, "could not open listener: {source}");
                Err(Error::Bind { addr, source })
            }
        }
    }

    /// The address actually bound (useful when the configured port is 0).
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections and dispatches them through `router` forever.
    pub async fn serve(self, router: Router) {
        self.serve_with_shutdown(router, std::future::pending()).await
    }

    /// Accepts connections until `signal` resolves, then drains in-flight
    /// connection tasks before returning.
    pub async fn serve_with_shutdown<F>(self, router: Router, signal: F)
    where
        F: Future<Output = ()>,
    {
        let router = Arc::new(router);
        let config = self.config;

        match self.listener.local_addr() {
            Ok(addr) => info!(%addr, ip = ?local_ip(), "sceneprobe listening"),
            Err(e) => warn!("sceneprobe listening on unknown address: {e}"),
        }

        let mut tasks = tokio::task::JoinSet::new();
        tokio::pin!(signal);

        loop {
            tokio::select! {
                // Check the signal first so shutdown wins over a backlog of
                // pending connections.
                biased;

                () = &mut signal => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = self.listener.accept() => {
                    let (stream, peer) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };
                    debug!(%peer, "connection accepted");

                    let router = Arc::clone(&router);
                    tasks.spawn(async move {
                        if let Err(e) = handle_connection(stream, &router, &config).await {
                            warn!(%peer, "connection error: {e}");
                        }
                    });
                }

                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined {
                        error!("connection task failed: {e}");
                    }
                }
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("sceneprobe stopped");
    }
}

// ── Connection handling ───────────────────────────────────────────────────────

/// Parse, route, respond, close.
///
/// Peers that send nothing (EOF, reset, timeout) get no reply. Unsupported
/// methods, malformed lines and lines cut off by the read timeout get a bare
/// `501`. A complete request line is answered even if the header block
/// never ends.
async fn handle_connection(
    mut stream: TcpStream,
    router: &Router,
    config: &ServerConfig,
) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.split();
    let mut reader = BufReader::new(read_half);

    let head = read_head(
        &mut reader,
        config.request_line_limit(),
        config.request_read_timeout(),
        config.header_drain_timeout(),
    )
    .await;

    let (method, response) = match head.and_then(|line| Request::parse(&line)) {
        Ok(req) => {
            debug!(method = %req.method(), path = %req.path(), "request");
            (req.method(), router.respond(&req).await)
        }
        Err(e) if e.is_answerable() => {
            debug!("rejecting request: {e}");
            (Method::Unsupported, Response::status(Status::NotImplemented))
        }
        Err(ParseError::Eof) => {
            debug!("peer closed before sending a request");
            return Ok(());
        }
        Err(e) => {
            warn!("dropping connection: {e}");
            return Ok(());
        }
    };

    let status = response.status_code();
    let reply = async {
        response.write_to(&mut write_half, method).await?;
        write_half.shutdown().await
    };
    match timeout(config.response_write_timeout(), reply).await {
        Ok(written) => written?,
        Err(_) => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "timed out writing response",
            ));
        }
    }
    debug!(status, "response sent");
    Ok(())
}

// ── Startup diagnostics ───────────────────────────────────────────────────────

/// First non-loopback address of this host, best effort.
///
/// Connecting a UDP socket only selects a route; nothing is sent.
pub fn local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(192, 0, 2, 1), 9)).ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_loopback() && !ip.is_unspecified()).then_some(ip)
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** and **SIGINT** (Ctrl-C); on
/// other platforms only Ctrl-C is available. A handler that cannot be
/// installed is logged and never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
