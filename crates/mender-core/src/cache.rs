//! Content-addressed cache for built reference graphs
//!
//! Entries live at `<cache-dir>/<sha256-hex>.json` and hold the node-link
//! serialization of the full graph built from exactly those bytes. Entries are
//! immutable, so concurrent builders of the same content write identical
//! files and the last rename wins harmlessly. There is no eviction; `clear`
//! is the only way entries go away.

use crate::error::{Error, IoContext, Result};
use crate::fs::atomic_write;
use crate::graph::{Graph, NodeLinkData};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// File extension of cache entries.
pub const CACHE_EXT: &str = "json";

/// Hex-encoded SHA-256 of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone)]
pub struct GraphCache {
    dir: PathBuf,
}

impl GraphCache {
    /// Open the cache, creating its directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).with_path(&dir)?;
        Ok(GraphCache { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for a content hash.
    pub fn entry_path(&self, hash: &str) -> PathBuf {
        self.dir.join(format!("{hash}.{CACHE_EXT}"))
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.entry_path(hash).is_file()
    }

    /// Load the graph stored for `hash`. A missing entry is `Ok(None)`; an
    /// entry that fails to decode is logged and treated as missing so the
    /// caller rebuilds and overwrites it.
    pub fn load(&self, hash: &str) -> Result<Option<Graph>> {
        let path = self.entry_path(hash);
        let json_str = match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(&path, e)),
        };

        let decoded = serde_json::from_str::<NodeLinkData>(&json_str)
            .map_err(|e| Error::Cache(e.to_string()))
            .and_then(Graph::from_node_link);

        match decoded {
            Ok(graph) => {
                tracing::debug!("Graph cache hit: {}", path.display());
                Ok(Some(graph))
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable graph cache entry {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    /// Store `graph` as the entry for `hash`.
    pub fn save(&self, hash: &str, graph: &Graph) -> Result<()> {
        let path = self.entry_path(hash);
        let json_str = serde_json::to_string(&graph.to_node_link())
            .map_err(|e| Error::Cache(e.to_string()))?;
        atomic_write(&path, json_str.as_bytes())?;
        tracing::debug!("Graph cache saved: {}", path.display());
        Ok(())
    }

    /// Remove every cache entry. Returns how many were removed.
    pub fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.dir).with_path(&self.dir)? {
            let path = entry.with_path(&self.dir)?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(CACHE_EXT) {
                std::fs::remove_file(&path).with_path(&path)?;
                removed += 1;
            }
        }
        tracing::info!("Cleared {} graph cache entries", removed);
        Ok(removed)
    }
}
