//! Minimal sceneprobe host: a directory of assets and a toy scene graph.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl http://localhost:4444/
//!   curl http://localhost:4444/scenes
//!   curl http://localhost:4444/scenes/root
//!   curl -I http://localhost:4444/scenes/camera

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use sceneprobe::{
    AssetCache, DEFAULT_PORT, DirAssetStore, MetadataRow, Router, SceneDirectory, SceneGraph,
    Server, ServerConfig, shutdown_signal,
};

#[derive(Parser)]
#[command(about = "Serve a toy scene graph over sceneprobe")]
struct Args {
    /// Port to listen on (all interfaces).
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Directory holding the bundled assets.
    #[arg(long, default_value = "demos/assets")]
    assets: PathBuf,

    /// Asset served for `/`.
    #[arg(long, default_value = "client.html")]
    entry: String,
}

/// Objects keyed by name, each with a handful of attributes.
struct ToyScene {
    objects: BTreeMap<&'static str, Vec<MetadataRow>>,
}

impl ToyScene {
    fn new() -> Self {
        let mut objects = BTreeMap::new();
        objects.insert("root", vec![
            MetadataRow::new("transform", "Transform", "identity"),
            MetadataRow::new("children", "Children", "2"),
        ]);
        objects.insert("camera", vec![
            MetadataRow::new("fov", "Field of view", "60"),
            MetadataRow::new("near", "Near plane", "0.1"),
            MetadataRow::new("far", "Far plane", "1000"),
        ]);
        Self { objects }
    }
}

impl SceneGraph for ToyScene {
    fn list_top_level_objects(&self) -> Vec<String> {
        self.objects.keys().map(|k| k.to_string()).collect()
    }

    // The first segment is the view name; the second picks the object.
    fn metadata(&self, path: &[String]) -> Option<Vec<MetadataRow>> {
        self.objects.get(path.get(1)?.as_str()).cloned()
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let cache = Arc::new(AssetCache::new(DirAssetStore::new(args.assets)));
    let router = Router::new(cache, SceneDirectory::new(ToyScene::new())).entry_file(args.entry);

    let server = match Server::bind(ServerConfig::default().port(args.port)).await {
        Ok(server) => server,
        Err(e) => {
            eprintln!("sceneprobe: {e}");
            std::process::exit(1);
        }
    };

    server.serve_with_shutdown(router, shutdown_signal()).await;
}
