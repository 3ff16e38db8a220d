//! Integration tests for Mender
//!
//! These tests drive a whole session the way an operator would: graph
//! queries to scope the work, line edits, then history to inspect or undo.

use mender_core::{BuildOptions, Config, NodeType};
use mender_indexer::SchemaGraphIndex;
use mender_tools::{Session, Status, ToolResult};
use serde_json::json;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const PETSTORE: &str = r##"openapi: 3.0.1
info:
  title: Petstore
  version: 1.0.0
paths:
  /pets:
    get:
      responses:
        '200':
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pets'
    post:
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Pet'
  /pets/{petId}:
    get:
      responses:
        '200':
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pet'
  /health:
    get:
      responses:
        '200':
          description: ok
components:
  schemas:
    Pet:
      type: object
      properties:
        tag:
          $ref: '#/components/schemas/Tag'
    Pets:
      type: array
      items:
        $ref: '#/components/schemas/Pet'
    Tag:
      type: strng
"##;

fn context() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("schema.yaml"), PETSTORE).unwrap();
    temp_dir
}

fn call(session: &Session, raw: serde_json::Value) -> ToolResult {
    session.invoke_json(&raw.to_string())
}

/// Scope a fix with the graph, edit, then undo it from history.
#[test]
fn test_repair_workflow() {
    let dir = context();
    let session = Session::open(dir.path(), Config::default()).unwrap();

    let related = call(
        &session,
        json!({"tool": "list_paths_related_to_component",
               "component_ref": "#/components/schemas/Pets",
               "max_distance_to_component": 3}),
    );
    assert_eq!(related, ToolResult::json(json!(["/pets", "/pets/{petId}"])));

    let search = call(
        &session,
        json!({"tool": "schema_editor", "command": "search", "search_text": "strng", "context_lines": 0}),
    );
    assert_eq!(search, ToolResult::text("→ 45:       type: strng"));

    let replace = call(
        &session,
        json!({"tool": "schema_editor", "command": "replace", "old_str": "strng", "new_str": "string"}),
    );
    assert_eq!(replace.status, Status::Success);
    assert!(fs::read_to_string(session.document_path()).unwrap().ends_with("type: string\n"));

    // The next call commits the edited state.
    call(&session, json!({"tool": "schema_editor", "command": "preview", "start_line": 1, "end_line": 1}));
    let snapshots = session.snapshots();
    assert_eq!(snapshots.len(), 2);

    session.restore(&snapshots[0].id).unwrap();
    assert_eq!(fs::read_to_string(session.document_path()).unwrap(), PETSTORE);
}

#[test]
fn test_extract_paths_then_graph_shrinks() {
    let dir = context();
    let session = Session::open(dir.path(), Config::default()).unwrap();

    let before = session.index().build_graph(&BuildOptions::default()).unwrap();
    assert_eq!(before.nodes_of_type(NodeType::Path).count(), 3);

    let result = call(
        &session,
        json!({"tool": "update_schema_extract_paths", "keep_paths": ["/pets/{petId}"]}),
    );
    assert_eq!(result, ToolResult::json(json!({"num_paths_dropped": 2})));

    let after = session.index().build_graph(&BuildOptions::default()).unwrap();
    let paths: Vec<&str> = after.nodes_of_type(NodeType::Path).map(|n| n.id.as_str()).collect();
    assert_eq!(paths, vec!["/pets/{petId}"]);
    // Components are untouched.
    assert_eq!(after.nodes_of_type(NodeType::Component).count(), 3);

    // Both document states have their own cache entry.
    assert_eq!(session.clear_cache().unwrap(), 2);
}

#[test]
fn test_separate_indexes_share_the_cache() {
    let dir = context();
    let config = Config::default();
    let first = SchemaGraphIndex::new(dir.path(), &config).unwrap();
    let second = SchemaGraphIndex::new(dir.path(), &config).unwrap();

    let a = first.build_graph(&BuildOptions::without_methods()).unwrap();
    let b = second.build_graph(&BuildOptions::default()).unwrap();
    assert_eq!(a.node_count(), b.node_count());
    assert_eq!(fs::read_dir(second.cache().dir()).unwrap().count(), 1);
}

#[test]
fn test_config_file_relocates_history_and_cache() {
    let dir = context();
    fs::write(
        dir.path().join(".mender.toml"),
        "history_dir = \".snapshots\"\ncache_dir = \"graphs\"\n",
    )
    .unwrap();

    let config = Config::load(dir.path()).unwrap();
    let session = Session::open(dir.path(), config).unwrap();
    session.index().build_graph(&BuildOptions::default()).unwrap();

    assert!(dir.path().join(".snapshots").join("schema.yaml").is_dir());
    assert_eq!(fs::read_dir(dir.path().join("graphs")).unwrap().count(), 1);
}

fn mender(dir: &TempDir, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_mender"))
        .arg("--root")
        .arg(dir.path())
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run mender")
}

#[test]
fn test_cli_preview_and_related() {
    let dir = context();

    let output = mender(&dir, &["preview", "--start", "1", "--end", "2"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1: openapi: 3.0.1\n2: info:\n");

    let output = mender(&dir, &["related", "#/components/schemas/Pets"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("\"/pets\""));
}

#[test]
fn test_cli_reports_tool_errors() {
    let dir = context();
    let output = mender(&dir, &["related", "Pets"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error: Invalid component reference"));
}

#[test]
fn test_cli_missing_document_fails() {
    let dir = TempDir::new().unwrap();
    let output = mender(&dir, &["status"]);
    assert!(!output.status.success());
}
