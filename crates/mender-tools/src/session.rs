//! One editing session over one document
//!
//! The session owns the commit-before-invoke contract: every tool call is
//! preceded by a history commit, so each state observed before a mutation
//! stays recoverable.

use crate::call::ToolCall;
use crate::handlers;
use crate::result::ToolResult;
use mender_core::{Config, Result};
use mender_editor::LineEditor;
use mender_history::{Snapshot, SnapshotHistory};
use mender_indexer::SchemaGraphIndex;
use std::path::Path;

#[derive(Debug)]
pub struct Session {
    config: Config,
    index: SchemaGraphIndex,
    editor: LineEditor,
    history: SnapshotHistory,
}

impl Session {
    /// Open a session on the document inside `context_dir`. Fails if the
    /// directory or document is missing; otherwise takes the initial snapshot.
    pub fn open(context_dir: &Path, config: Config) -> Result<Self> {
        let index = SchemaGraphIndex::new(context_dir, &config)?;
        let document_path = index.document_path().to_path_buf();
        let editor = LineEditor::new(document_path.clone())?.with_preview_lines(config.preview_lines);
        let history = SnapshotHistory::with_marker(&document_path, &config.history_dir)?;

        tracing::info!("Opened session on {}", document_path.display());
        Ok(Session {
            config,
            index,
            editor,
            history,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn document_path(&self) -> &Path {
        self.index.document_path()
    }

    pub fn index(&self) -> &SchemaGraphIndex {
        &self.index
    }

    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    /// Commit the current document, then run `call`.
    pub fn invoke(&self, call: &ToolCall) -> ToolResult {
        self.history.commit();
        tracing::debug!("Invoking {}", call.name());

        match call {
            ToolCall::ListPathsRelatedToComponent {
                component_ref,
                max_distance_to_component,
            } => handlers::list_paths_related_to_component(
                &self.index,
                component_ref,
                *max_distance_to_component,
            ),
            ToolCall::UpdateSchemaExtractPaths { keep_paths } => {
                handlers::update_schema_extract_paths(&self.index, keep_paths)
            }
            ToolCall::SchemaEditor(args) => {
                handlers::schema_editor(&self.editor, args, self.config.context_lines)
            }
        }
    }

    /// Decode a JSON tool call and invoke it. A malformed call is an error
    /// result and commits nothing.
    pub fn invoke_json(&self, raw: &str) -> ToolResult {
        match ToolCall::from_json(raw) {
            Ok(call) => self.invoke(&call),
            Err(e) => {
                tracing::warn!("Rejected tool call: {}", e);
                ToolResult::error(e)
            }
        }
    }

    pub fn commit(&self) -> Option<Snapshot> {
        self.history.commit()
    }

    pub fn is_committed(&self) -> bool {
        self.history.is_committed()
    }

    pub fn diff(&self) -> String {
        self.history.diff()
    }

    pub fn diff_from(&self, id: &str) -> Result<String> {
        self.history.diff_from(id)
    }

    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.history.snapshots()
    }

    pub fn restore(&self, id: &str) -> Result<Snapshot> {
        self.history.restore(id)
    }

    pub fn clear_cache(&self) -> Result<usize> {
        self.index.clear_cache()
    }
}
