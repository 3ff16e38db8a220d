//! Test utilities for mender-core

use crate::model::*;
use crate::graph::Graph;
use std::fs;
use tempfile::TempDir;

/// Create a temporary context directory holding the given files.
pub fn create_context_with(structure: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for (path, content) in structure {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }

    temp_dir
}

/// Foo <- Bar (references), Foo used in /a, Bar used in /b.
pub fn sample_graph() -> Graph {
    let mut graph = Graph::new();
    graph.add_node(GraphNode::component("#/components/schemas/Foo", "schemas"));
    graph.add_node(GraphNode::component("#/components/schemas/Bar", "schemas"));
    graph.add_node(GraphNode::path("/a", vec!["get".to_string()]));
    graph.add_node(GraphNode::path("/b", vec!["post".to_string()]));
    graph.add_edge(GraphEdge::new("#/components/schemas/Bar", "#/components/schemas/Foo", EdgeType::References));
    graph.add_edge(GraphEdge::new("#/components/schemas/Foo", "/a", EdgeType::UsedIn));
    graph.add_edge(GraphEdge::new("#/components/schemas/Bar", "/b", EdgeType::UsedIn));
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_context_with() {
        let temp_dir = create_context_with(&[("schema.yaml", "paths: {}\n"), ("nested/x.txt", "x")]);
        assert!(temp_dir.path().join("schema.yaml").exists());
        assert!(temp_dir.path().join("nested/x.txt").exists());
    }
}
