//! Mender Core: reference graph model, graph cache, diffs and configuration

pub mod error;
pub mod model;
pub mod graph;
pub mod cache;
pub mod diff;
pub mod config;
pub mod fs;


#[cfg(test)]
pub mod test_utils;

pub use error::{Error, Result, IoContext};
pub use model::{NodeType, EdgeType, GraphNode, GraphEdge, BuildOptions, COMPONENTS_PREFIX, WEBHOOK_PREFIX, component_id, webhook_id, is_component_ref};
pub use graph::{Graph, NodeLinkData};
pub use cache::{GraphCache, content_hash};
pub use diff::{unified_diff, elide_lines};
pub use config::{Config, CONFIG_FILE};
