//! Tool-call requests

use mender_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single tool invocation, tagged by tool name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolCall {
    /// Paths whose operations depend on a component within a hop budget
    ListPathsRelatedToComponent {
        component_ref: String,
        #[serde(default = "default_max_distance")]
        max_distance_to_component: i64,
    },
    /// Prune the document's `paths` down to `keep_paths`
    UpdateSchemaExtractPaths { keep_paths: Vec<String> },
    /// Line editor command
    SchemaEditor(SchemaEditorArgs),
}

fn default_max_distance() -> i64 {
    1
}

impl ToolCall {
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::ListPathsRelatedToComponent { .. } => "list_paths_related_to_component",
            ToolCall::UpdateSchemaExtractPaths { .. } => "update_schema_extract_paths",
            ToolCall::SchemaEditor(_) => "schema_editor",
        }
    }

    /// Parse a JSON tool call.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::invalid(format!("Invalid tool call: {e}")))
    }
}

/// Parameters of `schema_editor`. Which ones are required depends on
/// `command`; integers stay signed so negative input is reported as an
/// invalid argument instead of a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaEditorArgs {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_str: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_str: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_line: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_line: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<i64>,
    /// Falls back to the configured context size when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_lines: Option<i64>,
}

impl SchemaEditorArgs {
    pub fn new(command: EditorCommand) -> Self {
        SchemaEditorArgs {
            command: command.as_str().to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    Preview,
    Search,
    Replace,
    Insert,
}

impl EditorCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorCommand::Preview => "preview",
            EditorCommand::Search => "search",
            EditorCommand::Replace => "replace",
            EditorCommand::Insert => "insert",
        }
    }
}

impl std::str::FromStr for EditorCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "preview" => Ok(EditorCommand::Preview),
            "search" => Ok(EditorCommand::Search),
            "replace" => Ok(EditorCommand::Replace),
            "insert" => Ok(EditorCommand::Insert),
            other => Err(Error::invalid(format!("Unknown command: {other}"))),
        }
    }
}

/// Convert a caller-supplied integer to a count or line number.
pub(crate) fn non_negative(value: i64, name: &str) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Error::invalid(format!("`{name}` must be non-negative, got {value}")))
}
