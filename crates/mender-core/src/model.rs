//! Core data structures for the reference graph

use serde::{Deserialize, Serialize};

/// Namespace prefix shared by every component reference.
pub const COMPONENTS_PREFIX: &str = "#/components/";

/// Prefix applied to webhook names to keep them apart from path strings.
pub const WEBHOOK_PREFIX: &str = "webhook:";

/// Discriminates what kind of document entry a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// An entry under `components.<component_type>`.
    Component,
    /// An entry under `paths`.
    Path,
    /// An entry under `webhooks`.
    Webhook,
}

/// What kind of relationship this edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    /// component → component it points to.
    References,
    /// referenced component → path or webhook that uses it.
    UsedIn,
}

/// A single node in the reference graph.
///
/// `node_type` is `None` for ids that only appear as the target of a
/// reference and are never defined in the document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,
}

impl GraphNode {
    /// A node known only by id.
    pub fn unresolved(id: impl Into<String>) -> Self {
        GraphNode {
            id: id.into(),
            node_type: None,
            component_type: None,
            methods: None,
        }
    }

    pub fn component(id: impl Into<String>, component_type: impl Into<String>) -> Self {
        GraphNode {
            id: id.into(),
            node_type: Some(NodeType::Component),
            component_type: Some(component_type.into()),
            methods: None,
        }
    }

    pub fn path(id: impl Into<String>, methods: Vec<String>) -> Self {
        GraphNode {
            id: id.into(),
            node_type: Some(NodeType::Path),
            component_type: None,
            methods: Some(methods),
        }
    }

    pub fn webhook(id: impl Into<String>, methods: Vec<String>) -> Self {
        GraphNode {
            id: id.into(),
            node_type: Some(NodeType::Webhook),
            component_type: None,
            methods: Some(methods),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.node_type.is_some()
    }
}

/// A directed edge in the reference graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub edge_type: EdgeType,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, edge_type: EdgeType) -> Self {
        GraphEdge {
            source: source.into(),
            target: target.into(),
            edge_type,
        }
    }
}

/// Node id of a component entry.
pub fn component_id(component_type: &str, name: &str) -> String {
    format!("{COMPONENTS_PREFIX}{component_type}/{name}")
}

/// Node id of a webhook entry.
pub fn webhook_id(name: &str) -> String {
    format!("{WEBHOOK_PREFIX}{name}")
}

/// True if `reference` points into the components namespace.
pub fn is_component_ref(reference: &str) -> bool {
    reference.starts_with(COMPONENTS_PREFIX)
}

/// Options for building a graph view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Record method names on path and webhook nodes.
    pub include_methods: bool,
    /// Node ids omitted from both node and edge creation.
    pub exclude_nodes: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            include_methods: true,
            exclude_nodes: Vec::new(),
        }
    }
}

impl BuildOptions {
    pub fn without_methods() -> Self {
        BuildOptions {
            include_methods: false,
            exclude_nodes: Vec::new(),
        }
    }

    /// True when the options select the graph exactly as stored in the cache.
    pub fn is_full(&self) -> bool {
        self.include_methods && self.exclude_nodes.is_empty()
    }
}
