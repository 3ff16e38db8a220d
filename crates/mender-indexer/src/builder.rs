//! Builds the full reference graph from a parsed document

use crate::document::key_to_string;
use crate::refs::extract_refs;
use mender_core::{
    EdgeType, Graph, GraphEdge, GraphNode, NodeType, component_id, is_component_ref, webhook_id,
};
use serde_yaml::{Mapping, Value};

/// Build the full graph: every node, methods recorded, nothing excluded.
/// Narrower views are derived with [`Graph::view`].
pub fn build_full_graph(document: &Mapping) -> Graph {
    let mut graph = Graph::new();

    if let Some(components) = document.get("components").and_then(Value::as_mapping) {
        add_components(&mut graph, components);
    }
    if let Some(paths) = document.get("paths").and_then(Value::as_mapping) {
        add_operations(&mut graph, paths, NodeType::Path);
    }
    if let Some(webhooks) = document.get("webhooks").and_then(Value::as_mapping) {
        add_operations(&mut graph, webhooks, NodeType::Webhook);
    }

    graph
}

fn add_components(graph: &mut Graph, components: &Mapping) {
    for (component_type, entries) in components {
        let component_type = key_to_string(component_type);
        let Some(entries) = entries.as_mapping() else {
            tracing::debug!("Skipping non-mapping components section: {}", component_type);
            continue;
        };

        for (name, definition) in entries {
            let node_id = component_id(&component_type, &key_to_string(name));
            graph.add_node(GraphNode::component(&node_id, &component_type));
            for reference in extract_refs(definition) {
                graph.add_edge(GraphEdge::new(&node_id, reference, EdgeType::References));
            }
        }
    }
}

/// Paths and webhooks: the node records its item's keys as methods, and every
/// component it references gets a `used_in` edge pointing back at it.
fn add_operations(graph: &mut Graph, items: &Mapping, node_type: NodeType) {
    for (key, item) in items {
        let name = key_to_string(key);
        let methods: Vec<String> = item
            .as_mapping()
            .map(|m| m.keys().map(key_to_string).collect())
            .unwrap_or_default();

        let node = match node_type {
            NodeType::Webhook => GraphNode::webhook(webhook_id(&name), methods),
            _ => GraphNode::path(name, methods),
        };
        let node_id = node.id.clone();
        graph.add_node(node);

        for reference in extract_refs(item).into_iter().filter(|r| is_component_ref(r)) {
            graph.add_edge(GraphEdge::new(reference, &node_id, EdgeType::UsedIn));
        }
    }
}
