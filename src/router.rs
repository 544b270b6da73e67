//! Path routing.
//!
//! There is no route table. The number of path segments alone decides what
//! a request is asking for:
//!
//! | Segments | Route |
//! |---|---|
//! | none, or just the entry file's name | the entry file, via the asset cache |
//! | one | the top-level objects of the scene graph |
//! | two or more | the metadata of the addressed object |

use std::sync::Arc;

use tracing::error;

use crate::cache::AssetCache;
use crate::method::Method;
use crate::request::Request;
use crate::response::{FileType, Response};
use crate::scene::SceneDirectory;
use crate::status::Status;

/// Asset served for the empty path.
pub const DEFAULT_ENTRY_FILE: &str = "client.html";

/// Where a request path leads.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Route {
    EntryFile,
    TopLevel,
    Metadata,
}

impl Route {
    /// Classifies a segment list. Total: every list maps to exactly one route.
    pub fn for_segments<S: AsRef<str>>(segments: &[S], entry_file: &str) -> Self {
        match segments {
            [] => Self::EntryFile,
            [only] if only.as_ref() == entry_file => Self::EntryFile,
            [_] => Self::TopLevel,
            _ => Self::Metadata,
        }
    }
}

/// Turns a parsed [`Request`] into a [`Response`].
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
pub struct Router {
    cache: Arc<AssetCache>,
    scene: SceneDirectory,
    entry_file: String,
}

impl Router {
    pub fn new(cache: Arc<AssetCache>, scene: SceneDirectory) -> Self {
        Self { cache, scene, entry_file: DEFAULT_ENTRY_FILE.to_owned() }
    }

    /// Names the asset served for the empty path. Returns `self` for chaining.
    pub fn entry_file(mut self, name: impl Into<String>) -> Self {
        self.entry_file = name.into();
        self
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    /// Produces exactly one response for `req`.
    pub async fn respond(&self, req: &Request) -> Response {
        if req.method() == Method::Unsupported {
            return Response::status(Status::NotImplemented);
        }

        match Route::for_segments(req.segments(), &self.entry_file) {
            Route::EntryFile => self.entry().await,
            Route::TopLevel | Route::Metadata => self.listing(req.segments()).await,
        }
    }

    async fn entry(&self) -> Response {
        let content = self.cache.read_file(&self.entry_file).await;
        if content.is_empty() {
            return Response::status(Status::NotFound);
        }
        Response::asset(FileType::from_path(&self.entry_file), content)
    }

    async fn listing(&self, segments: &[String]) -> Response {
        let current_path = format!("/{}", segments.join("/"));
        match self.scene.lookup(segments.to_vec()).await {
            Ok(listing) => Response::html(listing.render(&current_path)),
            Err(e) => {
                error!(path = %current_path, "scene query failed: {e}");
                Response::status(Status::InternalServerError)
            }
        }
    }
}
