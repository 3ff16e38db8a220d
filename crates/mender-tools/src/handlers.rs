//! Tool handlers
//!
//! Each handler converts failures into an error-shaped [`ToolResult`].

use crate::call::{EditorCommand, SchemaEditorArgs, non_negative};
use crate::result::ToolResult;
use mender_core::{Error, Result};
use mender_editor::{LineEditor, LineMatcher};
use mender_indexer::SchemaGraphIndex;
use serde_json::json;

/// Text block returned when a search finds nothing.
pub const NO_MATCHES: &str = "No matches found.";

fn respond(tool: &str, outcome: Result<ToolResult>) -> ToolResult {
    match outcome {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!("Tool {} failed: {}", tool, e);
            ToolResult::error(e)
        }
    }
}

/// `list_paths_related_to_component`
pub fn list_paths_related_to_component(
    index: &SchemaGraphIndex,
    component_ref: &str,
    max_distance: i64,
) -> ToolResult {
    respond(
        "list_paths_related_to_component",
        related_paths(index, component_ref, max_distance),
    )
}

fn related_paths(index: &SchemaGraphIndex, component_ref: &str, max_distance: i64) -> Result<ToolResult> {
    let max_distance = non_negative(max_distance, "max_distance_to_component")?;
    let paths = index.list_paths_related_to_component(component_ref, max_distance)?;
    Ok(ToolResult::json(json!(paths)))
}

/// `update_schema_extract_paths`
pub fn update_schema_extract_paths(index: &SchemaGraphIndex, keep_paths: &[String]) -> ToolResult {
    let outcome = index
        .update_schema_extract_paths(keep_paths)
        .map(|dropped| ToolResult::json(json!({ "num_paths_dropped": dropped })));
    respond("update_schema_extract_paths", outcome)
}

/// `schema_editor`: dispatch on `args.command`.
pub fn schema_editor(editor: &LineEditor, args: &SchemaEditorArgs, default_context: usize) -> ToolResult {
    respond("schema_editor", run_editor_command(editor, args, default_context))
}

fn run_editor_command(
    editor: &LineEditor,
    args: &SchemaEditorArgs,
    default_context: usize,
) -> Result<ToolResult> {
    let command: EditorCommand = args.command.parse()?;
    let context_lines = match args.context_lines {
        Some(n) => non_negative(n, "context_lines")?,
        None => default_context,
    };
    tracing::debug!("schema_editor {}", command.as_str());

    match command {
        EditorCommand::Preview => {
            let start = args.start_line.map(|n| non_negative(n, "start_line")).transpose()?;
            let end = args.end_line.map(|n| non_negative(n, "end_line")).transpose()?;
            Ok(ToolResult::text(editor.preview(start, end)?))
        }
        EditorCommand::Search => {
            let matcher = LineMatcher::from_params(
                args.search_text.as_deref(),
                args.pattern.as_deref(),
                "search_text",
            )?;
            let blocks = editor.search(&matcher, context_lines)?;
            if blocks.is_empty() {
                Ok(ToolResult::text(NO_MATCHES))
            } else {
                Ok(ToolResult::texts(blocks))
            }
        }
        EditorCommand::Replace => {
            let matcher =
                LineMatcher::from_params(args.old_str.as_deref(), args.pattern.as_deref(), "old_str")?;
            let new_str = required(&args.new_str, "new_str")?;
            Ok(ToolResult::text(editor.replace(&matcher, new_str, context_lines)?))
        }
        EditorCommand::Insert => {
            let insert_line = args
                .insert_line
                .ok_or_else(|| Error::invalid("`insert_line` is required for insert"))?;
            let insert_line = non_negative(insert_line, "insert_line")?;
            let new_str = required(&args.new_str, "new_str")?;
            Ok(ToolResult::text(editor.insert(insert_line, new_str, context_lines)?))
        }
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| Error::invalid(format!("`{name}` is required")))
}
