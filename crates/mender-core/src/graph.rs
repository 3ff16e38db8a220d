//! Graph wrapper using petgraph::StableDiGraph keyed by string node ids

use crate::model::*;
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// The reference graph: a directed simple graph with stable indices.
#[derive(Clone)]
pub struct Graph {
    inner: StableDiGraph<GraphNode, GraphEdge>,
    index: HashMap<String, NodeIndex>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
        }
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.inner.add_node(GraphNode::unresolved(id));
        self.index.insert(id.to_string(), idx);
        idx
    }

    /// Add a node, or overwrite the attributes of an existing node with the same id.
    pub fn add_node(&mut self, node: GraphNode) {
        let idx = self.ensure_node(&node.id);
        self.inner[idx] = node;
    }

    /// Add an edge, creating unresolved endpoints as needed.
    /// An existing edge between the same pair is overwritten.
    pub fn add_edge(&mut self, edge: GraphEdge) {
        let source = self.ensure_node(&edge.source);
        let target = self.ensure_node(&edge.target);
        self.inner.update_edge(source, target, edge);
    }

    /// Get a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).and_then(|&idx| self.inner.node_weight(idx))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all nodes in insertion order.
    pub fn all_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
    }

    /// Iterate over all edges in insertion order.
    pub fn all_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.inner
            .edge_indices()
            .filter_map(move |idx| self.inner.edge_weight(idx))
    }

    /// Get all outgoing edges from a node.
    pub fn edges_from(&self, source: &str) -> Vec<&GraphEdge> {
        self.edges_directed(source, Direction::Outgoing)
    }

    /// Get all incoming edges to a node.
    pub fn edges_to(&self, target: &str) -> Vec<&GraphEdge> {
        self.edges_directed(target, Direction::Incoming)
    }

    fn edges_directed(&self, id: &str, dir: Direction) -> Vec<&GraphEdge> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        self.inner
            .edges_directed(idx, dir)
            .map(|edge_ref| edge_ref.weight())
            .collect()
    }

    /// Check if an edge of a given type exists between two nodes.
    pub fn has_edge_between(&self, source: &str, target: &str, edge_type: EdgeType) -> bool {
        self.edges_from(source)
            .iter()
            .any(|e| e.target == target && e.edge_type == edge_type)
    }

    /// Get all nodes of a specific type.
    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &GraphNode> {
        self.all_nodes()
            .filter(move |n| n.node_type == Some(node_type))
    }

    /// Remove a node and all its edges.
    pub fn remove_node(&mut self, id: &str) -> Option<GraphNode> {
        let idx = self.index.remove(id)?;
        self.inner.remove_node(idx)
    }

    pub fn is_cyclic(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.inner)
    }

    /// Unweighted shortest-path distances from `source`, following edges in
    /// their stored direction, up to `max_distance` hops. The source itself is
    /// reported at distance 0. Sorted by distance, then id.
    pub fn distances_from(&self, source: &str, max_distance: usize) -> Vec<(&GraphNode, usize)> {
        let Some(&start) = self.index.get(source) else {
            return Vec::new();
        };

        let mut distances: HashMap<NodeIndex, usize> = HashMap::new();
        distances.insert(start, 0);
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            let depth = distances[&current];
            if depth >= max_distance {
                continue;
            }
            for next in self.inner.neighbors_directed(current, Direction::Outgoing) {
                if !distances.contains_key(&next) {
                    distances.insert(next, depth + 1);
                    queue.push_back(next);
                }
            }
        }

        let mut reached: Vec<(&GraphNode, usize)> = distances
            .into_iter()
            .filter_map(|(idx, d)| self.inner.node_weight(idx).map(|n| (n, d)))
            .collect();
        reached.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)));
        reached
    }

    /// Derive the view selected by `options` from a full graph.
    ///
    /// Excluded ids lose their incident edges with them; unresolved nodes
    /// left without any edge are dropped, since they only existed as
    /// reference targets.
    pub fn view(&self, options: &BuildOptions) -> Graph {
        let mut view = self.clone();
        if options.is_full() {
            return view;
        }

        if !options.include_methods {
            for node in view.inner.node_weights_mut() {
                if node.methods.is_some() {
                    node.methods = Some(Vec::new());
                }
            }
        }

        if !options.exclude_nodes.is_empty() {
            let excluded: HashSet<&str> = options.exclude_nodes.iter().map(String::as_str).collect();
            for id in &excluded {
                view.remove_node(id);
            }
            let orphans: Vec<String> = view
                .inner
                .node_indices()
                .filter(|&idx| {
                    !view.inner[idx].is_resolved()
                        && view.inner.neighbors_undirected(idx).next().is_none()
                })
                .map(|idx| view.inner[idx].id.clone())
                .collect();
            for id in orphans {
                view.remove_node(&id);
            }
        }

        view
    }

    /// Serialize into the node-link layout.
    pub fn to_node_link(&self) -> NodeLinkData {
        NodeLinkData {
            directed: true,
            multigraph: false,
            graph: serde_json::Map::new(),
            nodes: self.all_nodes().cloned().collect(),
            edges: self.all_edges().cloned().collect(),
        }
    }

    /// Rebuild a graph from the node-link layout.
    pub fn from_node_link(data: NodeLinkData) -> crate::Result<Self> {
        if !data.directed || data.multigraph {
            return Err(crate::Error::Cache(
                "expected a directed, non-multigraph node-link document".to_string(),
            ));
        }
        let mut graph = Graph::new();
        for node in data.nodes {
            graph.add_node(node);
        }
        for edge in data.edges {
            graph.add_edge(edge);
        }
        Ok(graph)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

/// Node-link serialization: parallel node and edge lists with attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeLinkData {
    pub directed: bool,
    pub multigraph: bool,
    #[serde(default)]
    pub graph: serde_json::Map<String, serde_json::Value>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
