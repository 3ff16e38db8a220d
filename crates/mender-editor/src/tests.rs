//! Unit tests for mender-editor

use crate::{LineEditor, LineMatcher};
use mender_core::Error;
use std::fs;
use tempfile::TempDir;

fn editor_with(content: &str) -> (TempDir, LineEditor) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("schema.yaml");
    fs::write(&path, content).unwrap();
    let editor = LineEditor::new(path).unwrap();
    (temp_dir, editor)
}

fn numbered(count: usize) -> String {
    (1..=count).map(|i| format!("line{i}\n")).collect()
}

fn literal(text: &str) -> LineMatcher {
    LineMatcher::Literal(text.to_string())
}

fn read(editor: &LineEditor) -> String {
    fs::read_to_string(editor.document_path()).unwrap()
}

#[test]
fn test_missing_document_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let err = LineEditor::new(temp_dir.path().join("schema.yaml")).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_preview_default_window() {
    let (_dir, editor) = editor_with(&numbered(60));
    let out = editor.preview(None, None).unwrap();

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 51);
    assert_eq!(lines[0], "1: line1");
    assert_eq!(lines[49], "50: line50");
    assert_eq!(lines[50], "... 10 more lines ...");
}

#[test]
fn test_preview_short_document_has_no_marker() {
    let (_dir, editor) = editor_with("a: 1\nb: 2\n");
    insta::assert_snapshot!(editor.preview(None, None).unwrap(), @r"
    1: a: 1
    2: b: 2
    ");
}

#[test]
fn test_preview_configured_window() {
    let (_dir, editor) = editor_with(&numbered(5));
    let editor = editor.with_preview_lines(2);
    assert_eq!(editor.preview(None, None).unwrap(), "1: line1\n2: line2\n... 3 more lines ...");
}

#[test]
fn test_preview_exact_range() {
    let (_dir, editor) = editor_with(&numbered(10));
    assert_eq!(editor.preview(Some(5), Some(5)).unwrap(), "5: line5");
    assert_eq!(editor.preview(Some(9), Some(20)).unwrap(), "9: line9\n10: line10");
}

#[test]
fn test_preview_requires_both_bounds() {
    let (_dir, editor) = editor_with(&numbered(10));
    assert!(matches!(editor.preview(Some(1), None), Err(Error::InvalidArgument(_))));
    assert!(matches!(editor.preview(None, Some(3)), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_search_literal_with_context() {
    let (_dir, editor) = editor_with(&numbered(10));
    let blocks = editor.search(&literal("line5"), 1).unwrap();

    assert_eq!(blocks.len(), 1);
    insta::assert_snapshot!(blocks[0], @r"
      4: line4
    → 5: line5
      6: line6
    ");
}

#[test]
fn test_search_pattern_one_block_per_match() {
    let (_dir, editor) = editor_with(&numbered(12));
    let matcher = LineMatcher::from_params(None, Some(r"^line1\d?$"), "search_text").unwrap();
    let blocks = editor.search(&matcher, 0).unwrap();

    assert_eq!(blocks, vec!["→ 1: line1", "→ 10: line10", "→ 11: line11", "→ 12: line12"]);
}

#[test]
fn test_search_no_matches_is_empty() {
    let (_dir, editor) = editor_with(&numbered(3));
    assert!(editor.search(&literal("absent"), 2).unwrap().is_empty());
}

#[test]
fn test_search_replace_search() {
    let (_dir, editor) = editor_with("type: strng\nitems:\n  type: strng\n");

    assert_eq!(editor.search(&literal("strng"), 0).unwrap().len(), 2);
    let diff = editor.replace(&literal("strng"), "string", 2).unwrap();
    assert!(diff.contains("-type: strng"));
    assert!(diff.contains("+type: string"));

    assert_eq!(editor.search(&literal("string"), 0).unwrap().len(), 2);
    assert!(editor.search(&literal("strng"), 0).unwrap().is_empty());
    assert_eq!(read(&editor), "type: string\nitems:\n  type: string\n");
}

#[test]
fn test_replace_pattern_every_occurrence() {
    let (_dir, editor) = editor_with("a: foo1\nb: foo2 foo3\nc: foo\n");
    let matcher = LineMatcher::from_params(None, Some("foo[0-9]"), "old_str").unwrap();
    editor.replace(&matcher, "bar", 2).unwrap();

    assert_eq!(read(&editor), "a: bar\nb: bar bar\nc: foo\n");
}

#[test]
fn test_replace_pattern_keeps_dollar_text() {
    let (_dir, editor) = editor_with("schema: OLD\n");
    let matcher = LineMatcher::from_params(None, Some("OLD"), "old_str").unwrap();
    editor
        .replace(&matcher, "{$ref: '#/components/schemas/Foo'}", 2)
        .unwrap();

    assert_eq!(read(&editor), "schema: {$ref: '#/components/schemas/Foo'}\n");
}

#[test]
fn test_replace_multiline_literal() {
    let (_dir, editor) = editor_with("a:\n  b: 1\n  c: 2\nd: 3\n");
    let diff = editor.replace(&literal("  b: 1\n  c: 2"), "  e: 4", 0).unwrap();

    assert_eq!(read(&editor), "a:\n  e: 4\nd: 3\n");
    assert!(diff.lines().any(|l| l == "-  b: 1"));
    assert!(diff.lines().any(|l| l == "-  c: 2"));
    assert!(diff.lines().any(|l| l == "+  e: 4"));
}

#[test]
fn test_replace_without_match_leaves_file() {
    let (_dir, editor) = editor_with("a: 1");
    assert_eq!(editor.replace(&literal("zzz"), "y", 2).unwrap(), "");
    assert_eq!(read(&editor), "a: 1");
}

#[test]
fn test_replace_rejects_empty_literal() {
    let (_dir, editor) = editor_with("a: 1\n");
    assert!(matches!(editor.replace(&literal(""), "x", 2), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_insert_at_top() {
    let (_dir, editor) = editor_with("a\nb\n");
    let diff = editor.insert(0, "X", 2).unwrap();

    assert_eq!(read(&editor), "X\na\nb\n");
    let added: Vec<&str> = diff
        .lines()
        .filter(|l| l.starts_with('+') && !l.starts_with("+++"))
        .collect();
    assert_eq!(added, vec!["+X"]);
    assert!(!diff.lines().any(|l| l.starts_with('-') && !l.starts_with("---")));
}

#[test]
fn test_insert_multiple_lines_after() {
    let (_dir, editor) = editor_with("a\nb\nc\n");
    editor.insert(2, "x\ny", 1).unwrap();
    assert_eq!(read(&editor), "a\nb\nx\ny\nc\n");
}

#[test]
fn test_insert_past_end_appends() {
    let (_dir, editor) = editor_with("a\nb");
    editor.insert(99, "z", 0).unwrap();
    assert_eq!(read(&editor), "a\nb\nz");
}

#[test]
fn test_edits_see_latest_disk_content() {
    let (_dir, editor) = editor_with("a\n");
    fs::write(editor.document_path(), "changed\n").unwrap();
    assert_eq!(editor.preview(Some(1), Some(1)).unwrap(), "1: changed");
}
