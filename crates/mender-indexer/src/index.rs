//! Graph queries and path pruning against the on-disk document

use crate::builder::build_full_graph;
use crate::document::{key_to_string, parse_document, render_document};
use mender_core::fs::{atomic_write, read_bytes};
use mender_core::{
    BuildOptions, Config, Error, Graph, GraphCache, NodeType, Result, content_hash,
    is_component_ref,
};
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Reference graph index for one document.
///
/// The document is re-read on every call; graphs are memoized only through
/// the content-addressed [`GraphCache`].
#[derive(Debug)]
pub struct SchemaGraphIndex {
    document_path: PathBuf,
    cache: GraphCache,
}

impl SchemaGraphIndex {
    /// Open the index for the document inside `context_dir`.
    /// Fails if the context directory or document is missing.
    pub fn new(context_dir: &Path, config: &Config) -> Result<Self> {
        let context_dir = context_dir.canonicalize().map_err(|_| {
            Error::not_found(format!("Context directory not found: {}", context_dir.display()))
        })?;
        Self::with_paths(config.document_path(&context_dir), config.cache_path(&context_dir))
    }

    pub fn with_paths(document_path: PathBuf, cache_dir: PathBuf) -> Result<Self> {
        if !document_path.is_file() {
            return Err(Error::not_found(format!(
                "Schema file not found: {}",
                document_path.display()
            )));
        }
        let cache = GraphCache::open(cache_dir)?;
        Ok(SchemaGraphIndex { document_path, cache })
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    pub fn cache(&self) -> &GraphCache {
        &self.cache
    }

    /// Build (or load from cache) the graph of the current document bytes and
    /// return the view selected by `options`.
    pub fn build_graph(&self, options: &BuildOptions) -> Result<Graph> {
        let bytes = read_bytes(&self.document_path)?;
        let hash = content_hash(&bytes);

        let full = match self.cache.load(&hash)? {
            Some(graph) => graph,
            None => {
                let document = parse_document(&bytes)?;
                let graph = build_full_graph(&document);
                tracing::info!(
                    "Built reference graph: {} nodes, {} edges",
                    graph.node_count(),
                    graph.edge_count()
                );
                if let Err(e) = self.cache.save(&hash, &graph) {
                    tracing::warn!("Could not cache graph {}: {}", hash, e);
                }
                graph
            }
        };

        Ok(full.view(options))
    }

    /// Paths reachable from `component_ref` within `max_distance` hops.
    pub fn list_paths_related_to_component(
        &self,
        component_ref: &str,
        max_distance: usize,
    ) -> Result<Vec<String>> {
        if !is_component_ref(component_ref) {
            return Err(Error::invalid(format!("Invalid component reference: {component_ref}")));
        }

        let graph = self.build_graph(&BuildOptions::without_methods())?;
        if !graph.contains(component_ref) {
            return Err(Error::not_found(format!("Component not found: {component_ref}")));
        }

        let related = graph
            .distances_from(component_ref, max_distance)
            .into_iter()
            .filter(|(node, distance)| *distance > 0 && node.node_type == Some(NodeType::Path))
            .map(|(node, _)| node.id.clone())
            .collect();
        Ok(related)
    }

    /// Keep only the `paths` entries named in `keep_paths` and rewrite the
    /// document. Returns how many entries were dropped.
    ///
    /// Destructive, and not recorded in history by itself: callers commit a
    /// snapshot beforehand.
    pub fn update_schema_extract_paths(&self, keep_paths: &[String]) -> Result<usize> {
        let bytes = read_bytes(&self.document_path)?;
        let mut document = parse_document(&bytes)?;

        let keep: HashSet<&str> = keep_paths.iter().map(String::as_str).collect();
        let key = Value::String("paths".to_string());
        let (before, kept) = match document.get(&key) {
            Some(Value::Mapping(paths)) => {
                let kept: Mapping = paths
                    .iter()
                    .filter(|(path, _)| keep.contains(key_to_string(path).as_str()))
                    .map(|(path, item)| (path.clone(), item.clone()))
                    .collect();
                (paths.len(), kept)
            }
            // A missing or null section becomes an empty mapping.
            None | Some(Value::Null) => (0, Mapping::new()),
            Some(other) => {
                return Err(Error::ParseFailure(format!(
                    "`paths` must be a mapping, found {}",
                    value_kind(other)
                )));
            }
        };
        let dropped = before - kept.len();
        document.insert(key, Value::Mapping(kept));

        let rendered = render_document(&document)?;
        atomic_write(&self.document_path, rendered.as_bytes())?;
        tracing::info!(
            "Dropped {} of {} paths from {}",
            dropped,
            before,
            self.document_path.display()
        );
        Ok(dropped)
    }

    /// Remove every cached graph.
    pub fn clear_cache(&self) -> Result<usize> {
        self.cache.clear()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
