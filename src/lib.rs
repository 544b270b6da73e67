//! # sceneprobe
//!
//! An embedded diagnostic HTTP server. It runs inside a native application
//! and lets a browser on the local network look at the live scene graph and
//! at the files bundled with the app.
//!
//! ## The contract
//!
//! sceneprobe is a debugging window, not a web server. It speaks a small
//! HTTP/1.0 subset and nothing else:
//!
//! - **Methods** — `GET` and `HEAD`. Anything else gets `501 Not Implemented`.
//! - **Connections** — one request per connection, `Connection: close`.
//! - **No TLS, no chunking, no keep-alive** — keep it on a trusted network.
//!
//! What it does with a request depends only on how many path segments it has:
//!
//! - `/` — the bundled entry file (`client.html`), through a read-through cache
//! - `/scenes` — a link list of the top-level scene objects
//! - `/scenes/root/transform` — the attribute table of that object
//!
//! The host supplies two collaborators: an [`AssetStore`] for bundled files
//! and a [`SceneGraph`] for the engine's two read-only queries.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sceneprobe::{
//!     AssetCache, DirAssetStore, MetadataRow, Router, SceneDirectory, SceneGraph, Server,
//!     ServerConfig,
//! };
//!
//! struct Engine;
//!
//! impl SceneGraph for Engine {
//!     fn list_top_level_objects(&self) -> Vec<String> {
//!         vec!["root".into()]
//!     }
//!
//!     fn metadata(&self, _path: &[String]) -> Option<Vec<MetadataRow>> {
//!         None
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sceneprobe::Error> {
//!     let cache = Arc::new(AssetCache::new(DirAssetStore::new("assets")));
//!     let router = Router::new(cache, SceneDirectory::new(Engine));
//!
//!     Server::bind(ServerConfig::default()).await?.serve(router).await;
//!     Ok(())
//! }
//! ```

mod cache;
mod config;
mod error;
mod method;
mod request;
mod response;
mod router;
mod scene;
mod server;
mod status;

pub mod html;

pub use cache::{AssetCache, AssetStore, DirAssetStore};
pub use config::{DEFAULT_PORT, ServerConfig};
pub use error::Error;
pub use method::Method;
pub use request::{ParseError, Request, split_segments};
pub use response::{FileType, Response, SERVER_TOKEN, build_header};
pub use router::{DEFAULT_ENTRY_FILE, Route, Router};
pub use scene::{DirectoryRow, Listing, MetadataRow, SceneDirectory, SceneGraph, Serialized};
pub use server::{Server, local_ip, shutdown_signal};
pub use status::{Status, reason_phrase};
