//! Shared fixtures for the integration tests: call-counting collaborators,
//! a server spawned on an ephemeral port, and a raw TCP client.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sceneprobe::{
    AssetCache, AssetStore, MetadataRow, Router, SceneDirectory, SceneGraph, Server, ServerConfig,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

// ── Collaborators ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeAssets {
    files: HashMap<String, Vec<u8>>,
    reads: AtomicUsize,
}

impl FakeAssets {
    pub fn with(files: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            files: files.iter().map(|(k, v)| (k.to_string(), v.as_bytes().to_vec())).collect(),
            reads: AtomicUsize::new(0),
        })
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl AssetStore for FakeAssets {
    fn read_asset(&self, path: &str) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_owned()))
    }
}

#[derive(Default)]
pub struct FakeEngine {
    pub objects: Vec<String>,
    pub metadata: HashMap<Vec<String>, Vec<MetadataRow>>,
    pub list_calls: AtomicUsize,
    pub metadata_calls: AtomicUsize,
}

impl FakeEngine {
    /// `scenes/root` has one attribute; everything else has none.
    pub fn sample() -> Arc<Self> {
        let mut metadata = HashMap::new();
        metadata.insert(
            vec!["scenes".to_owned(), "root".to_owned()],
            vec![MetadataRow::new("transform", "Transform", "identity")],
        );
        Arc::new(Self {
            objects: vec!["root".into(), "camera".into()],
            metadata,
            ..Default::default()
        })
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }
}

impl SceneGraph for FakeEngine {
    fn list_top_level_objects(&self) -> Vec<String> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.objects.clone()
    }

    fn metadata(&self, path: &[String]) -> Option<Vec<MetadataRow>> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        if path.last().map(String::as_str) == Some("boom") {
            panic!("engine fault");
        }
        self.metadata.get(path).cloned()
    }
}

// ── Server fixture ────────────────────────────────────────────────────────────

pub struct TestServer {
    pub addr: SocketAddr,
    pub cache: Arc<AssetCache>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start(assets: Arc<FakeAssets>, engine: Arc<FakeEngine>) -> Self {
        Self::start_with(assets, engine, test_config(), |router| router).await
    }

    pub async fn start_with(
        assets: Arc<FakeAssets>,
        engine: Arc<FakeEngine>,
        config: ServerConfig,
        customize: impl FnOnce(Router) -> Router,
    ) -> Self {
        let cache = Arc::new(AssetCache::new(assets));
        let router = customize(Router::new(Arc::clone(&cache), SceneDirectory::new(engine)));

        let server = Server::bind(config).await.unwrap();
        let addr = server.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            server
                .serve_with_shutdown(router, async move {
                    let _ = rx.await;
                })
                .await;
        });

        Self { addr, cache, shutdown: Some(tx), handle }
    }

    /// Signals shutdown and waits for the accept loop to return.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        (&mut self.handle).await.unwrap();
    }
}

pub fn test_config() -> ServerConfig {
    ServerConfig::default()
        .addr("127.0.0.1:0".parse().unwrap())
        .read_timeout(std::time::Duration::from_secs(2))
}

// ── Client ────────────────────────────────────────────────────────────────────

pub struct Reply {
    pub head: String,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn status_line(&self) -> &str {
        self.head.lines().next().unwrap_or("")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (k, v) = line.split_once(':')?;
            k.eq_ignore_ascii_case(name).then(|| v.trim())
        })
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends `raw` on a fresh connection and reads until the server closes it.
pub async fn send(addr: SocketAddr, raw: &str) -> Reply {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();

    let split = buf
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|i| i + 4)
        .unwrap_or(buf.len());
    let body = buf.split_off(split);
    Reply { head: String::from_utf8_lossy(&buf).into_owned(), body }
}

pub async fn get(addr: SocketAddr, path: &str) -> Reply {
    send(addr, &format!("GET {path} HTTP/1.0\r\nHost: test\r\n\r\n")).await
}

pub async fn head(addr: SocketAddr, path: &str) -> Reply {
    send(addr, &format!("HEAD {path} HTTP/1.0\r\nHost: test\r\n\r\n")).await
}
