//! The boundary to the live scene graph.
//!
//! The engine is reached through exactly two read-only queries, modelled by
//! [`SceneGraph`]. [`SceneDirectory`] turns URL segments into one of those
//! queries and normalizes the answer into a [`Listing`] the router can render.
//!
//! Implementations of [`SceneGraph`] must tolerate being called from several
//! connection tasks at once. An engine that cannot should be wrapped in
//! [`Serialized`].

use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinError;

use crate::html;

/// One attribute of a scene-graph object, as reported by the engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetadataRow {
    /// Name used to address the attribute in a child path.
    pub name: String,
    pub label: String,
    pub value: String,
}

impl MetadataRow {
    pub fn new(name: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), label: label.into(), value: value.into() }
    }
}

/// A row of the metadata table, ready for display.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DirectoryRow {
    pub label: String,
    pub value: String,
    /// Segment appended to the current path to build the row's link.
    pub child_name: String,
}

impl From<MetadataRow> for DirectoryRow {
    fn from(row: MetadataRow) -> Self {
        Self { label: row.label, value: row.value, child_name: row.name }
    }
}

/// Read-only queries into the host's scene graph.
pub trait SceneGraph: Send + Sync + 'static {
    /// Names of the root-level objects, in display order.
    fn list_top_level_objects(&self) -> Vec<String>;

    /// Attributes of the object addressed by `path`, or `None` when the
    /// engine has nothing to report for it.
    fn metadata(&self, path: &[String]) -> Option<Vec<MetadataRow>>;
}

impl<G: SceneGraph + ?Sized> SceneGraph for Arc<G> {
    fn list_top_level_objects(&self) -> Vec<String> {
        (**self).list_top_level_objects()
    }

    fn metadata(&self, path: &[String]) -> Option<Vec<MetadataRow>> {
        (**self).metadata(path)
    }
}

/// Funnels every query through one lock.
///
/// For engines whose query entry points are not safe to call concurrently.
pub struct Serialized<G> {
    inner: Mutex<G>,
}

impl<G> Serialized<G> {
    pub fn new(graph: G) -> Self {
        Self { inner: Mutex::new(graph) }
    }
}

impl<G: SceneGraph> SceneGraph for Serialized<G> {
    fn list_top_level_objects(&self) -> Vec<String> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).list_top_level_objects()
    }

    fn metadata(&self, path: &[String]) -> Option<Vec<MetadataRow>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).metadata(path)
    }
}

// ── Listing ───────────────────────────────────────────────────────────────────

/// A normalized answer from the scene graph.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Listing {
    /// Top-level object names.
    Objects(Vec<String>),
    /// Attributes of one object.
    Table(Vec<DirectoryRow>),
    /// The metadata query had no result.
    NoFields,
}

impl Listing {
    /// Renders the listing as an HTML fragment whose links extend `current_path`.
    pub fn render(&self, current_path: &str) -> String {
        match self {
            Self::Objects(names) => html::link_list(current_path, names.as_slice()),
            Self::Table(rows)    => html::attribute_table(current_path, rows),
            Self::NoFields       => html::NO_FIELDS.to_owned(),
        }
    }
}

// ── SceneDirectory ────────────────────────────────────────────────────────────

/// Maps URL segments onto scene-graph queries.
#[derive(Clone)]
pub struct SceneDirectory {
    graph: Arc<dyn SceneGraph>,
}

impl SceneDirectory {
    pub fn new(graph: impl SceneGraph) -> Self {
        Self { graph: Arc::new(graph) }
    }

    /// Runs the query for `segments` on the blocking pool.
    ///
    /// A single segment (or none) lists the top-level objects; two or more
    /// ask for the metadata of that path. The error case only occurs when
    /// the engine panics.
    pub async fn lookup(&self, segments: Vec<String>) -> Result<Listing, JoinError> {
        let graph = Arc::clone(&self.graph);
        tokio::task::spawn_blocking(move || query(&*graph, &segments)).await
    }
}

/// Synchronous form of [`SceneDirectory::lookup`].
pub fn query(graph: &dyn SceneGraph, segments: &[String]) -> Listing {
    if segments.len() <= 1 {
        return Listing::Objects(graph.list_top_level_objects());
    }
    match graph.metadata(segments) {
        Some(rows) => Listing::Table(rows.into_iter().map(DirectoryRow::from).collect()),
        None => Listing::NoFields,
    }
}
