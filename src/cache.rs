//! Read-through asset cache.
//!
//! Bundled assets never change while the process runs, so an entry, once
//! loaded, is kept forever: no eviction, no invalidation.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Read-only store of bundled files.
pub trait AssetStore: Send + Sync + 'static {
    /// Reads the whole file named `path`.
    fn read_asset(&self, path: &str) -> io::Result<Vec<u8>>;
}

impl<S: AssetStore + ?Sized> AssetStore for Arc<S> {
    fn read_asset(&self, path: &str) -> io::Result<Vec<u8>> {
        (**self).read_asset(path)
    }
}

// ── DirAssetStore ─────────────────────────────────────────────────────────────

/// An [`AssetStore`] backed by a directory on disk.
pub struct DirAssetStore {
    base_dir: PathBuf,
}

impl DirAssetStore {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self { base_dir: base.into() }
    }

    /// Resolves `path` under the base directory. Anything that could
    /// escape it (`..`, absolute paths, drive prefixes) is refused.
    fn map_path(&self, path: &str) -> Option<PathBuf> {
        let mut pb = self.base_dir.clone();
        for comp in Path::new(path).components() {
            match comp {
                Component::Normal(s) => pb.push(s),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(pb)
    }
}

impl AssetStore for DirAssetStore {
    fn read_asset(&self, path: &str) -> io::Result<Vec<u8>> {
        let full = self
            .map_path(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "invalid asset path"))?;
        std::fs::read(full)
    }
}

// ── AssetCache ────────────────────────────────────────────────────────────────

/// Lazily populated, never evicted map from asset path to content.
///
/// Hits are served straight from the map. Misses take a single fill lock,
/// re-check the map, then read from the store on the blocking pool, so two
/// concurrent misses on the same path read the store once.
pub struct AssetCache {
    store: Arc<dyn AssetStore>,
    entries: DashMap<String, Bytes>,
    fill: Mutex<()>,
}

impl AssetCache {
    pub fn new(store: impl AssetStore) -> Self {
        Self { store: Arc::new(store), entries: DashMap::new(), fill: Mutex::new(()) }
    }

    /// Returns the content of `path`, loading it on first use.
    ///
    /// A failed read yields empty content and is not remembered: the next
    /// call asks the store again. An empty file and a failed read look the
    /// same to the caller.
    pub async fn read_file(&self, path: &str) -> Bytes {
        if let Some(hit) = self.get(path) {
            return hit;
        }

        let _guard = self.fill.lock().await;
        if let Some(hit) = self.get(path) {
            return hit;
        }

        let store = Arc::clone(&self.store);
        let owned = path.to_owned();
        let loaded = tokio::task::spawn_blocking(move || store.read_asset(&owned)).await;

        match loaded {
            Ok(Ok(content)) => {
                debug!(path, bytes = content.len(), "loaded asset");
                let content = Bytes::from(content);
                self.entries.insert(path.to_owned(), content.clone());
                content
            }
            Ok(Err(e)) => {
                warn!(path, "asset read failed: {e}");
                Bytes::new()
            }
            Err(e) => {
                warn!(path, "asset store panicked: {e}");
                Bytes::new()
            }
        }
    }

    fn get(&self, path: &str) -> Option<Bytes> {
        let hit = self.entries.get(path)?.value().clone();
        debug!(path, "pulled from cache");
        Some(hit)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
