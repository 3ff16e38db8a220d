//! CLI command implementations

use mender_core::{Config, GraphCache, elide_lines};
use mender_tools::{EditorCommand, SchemaEditorArgs, Session, ToolCall, ToolResult};
use std::path::Path;

/// Load configuration for `root` and open a session on its document.
/// Opening takes a snapshot when the document changed since the last one.
fn open_session(root: &Path) -> anyhow::Result<Session> {
    let config = Config::load(root)?;
    Ok(Session::open(root, config)?)
}

/// Print a tool result; error results exit non-zero.
fn emit(result: ToolResult) -> anyhow::Result<()> {
    if result.is_success() {
        println!("{}", result.render());
        Ok(())
    } else {
        eprintln!("{}", result.render());
        std::process::exit(1);
    }
}

fn run_editor(root: &Path, args: SchemaEditorArgs) -> anyhow::Result<()> {
    let session = open_session(root)?;
    emit(session.invoke(&ToolCall::SchemaEditor(args)))
}

pub fn preview(root: &Path, start: Option<i64>, end: Option<i64>) -> anyhow::Result<()> {
    let mut args = SchemaEditorArgs::new(EditorCommand::Preview);
    args.start_line = start;
    args.end_line = end;
    run_editor(root, args)
}

pub fn search(
    root: &Path,
    text: Option<String>,
    pattern: Option<String>,
    context: Option<i64>,
) -> anyhow::Result<()> {
    let mut args = SchemaEditorArgs::new(EditorCommand::Search);
    args.search_text = text;
    args.pattern = pattern;
    args.context_lines = context;
    run_editor(root, args)
}

pub fn replace(
    root: &Path,
    old: Option<String>,
    pattern: Option<String>,
    new: String,
    context: Option<i64>,
) -> anyhow::Result<()> {
    let mut args = SchemaEditorArgs::new(EditorCommand::Replace);
    args.old_str = old;
    args.pattern = pattern;
    args.new_str = Some(new);
    args.context_lines = context;
    run_editor(root, args)
}

pub fn insert(root: &Path, line: i64, text: String, context: Option<i64>) -> anyhow::Result<()> {
    let mut args = SchemaEditorArgs::new(EditorCommand::Insert);
    args.insert_line = Some(line);
    args.new_str = Some(text);
    args.context_lines = context;
    run_editor(root, args)
}

pub fn related(root: &Path, component_ref: String, max_distance: i64) -> anyhow::Result<()> {
    let session = open_session(root)?;
    emit(session.invoke(&ToolCall::ListPathsRelatedToComponent {
        component_ref,
        max_distance_to_component: max_distance,
    }))
}

pub fn extract_paths(root: &Path, keep_paths: Vec<String>) -> anyhow::Result<()> {
    let session = open_session(root)?;
    emit(session.invoke(&ToolCall::UpdateSchemaExtractPaths { keep_paths }))
}

/// Raw tool call; the JSON result goes to stdout whatever its status.
pub fn call(root: &Path, raw: &str) -> anyhow::Result<()> {
    let session = open_session(root)?;
    let result = session.invoke_json(raw);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub fn commit(root: &Path) -> anyhow::Result<()> {
    let session = open_session(root)?;
    session.commit();
    match session.history().last_snapshot() {
        Some(snapshot) => println!("Committed {}", snapshot.id),
        None => println!("Nothing committed"),
    }
    Ok(())
}

pub fn status(root: &Path) -> anyhow::Result<()> {
    let session = open_session(root)?;
    let snapshots = session.snapshots();

    println!("Document:  {}", session.document_path().display());
    println!("History:   {}", session.history().snapshots_dir().display());
    println!("Snapshots: {}", snapshots.len());
    if let Some(latest) = snapshots.last() {
        println!("Latest:    {}", latest.id);
    }
    println!("Committed: {}", if session.is_committed() { "yes" } else { "no" });
    Ok(())
}

pub fn diff(root: &Path, snapshot: Option<String>, max_lines: Option<usize>) -> anyhow::Result<()> {
    let session = open_session(root)?;

    let id = match snapshot {
        Some(id) => id,
        None => {
            let snapshots = session.snapshots();
            // The newest snapshot is the current content once the session is open.
            match snapshots.len().checked_sub(2).map(|i| &snapshots[i]) {
                Some(previous) => previous.id.clone(),
                None => {
                    println!("No earlier snapshot");
                    return Ok(());
                }
            }
        }
    };

    let diff = session.diff_from(&id)?;
    if diff.is_empty() {
        println!("No changes since {id}");
        return Ok(());
    }
    match max_lines {
        Some(max) => println!("{}", elide_lines(&diff, max.saturating_sub(1), 1)),
        None => println!("{diff}"),
    }
    Ok(())
}

pub fn snapshots(root: &Path) -> anyhow::Result<()> {
    let session = open_session(root)?;
    for snapshot in session.snapshots() {
        println!("{}\t{}", snapshot.id, snapshot.path.display());
    }
    Ok(())
}

pub fn restore(root: &Path, id: &str) -> anyhow::Result<()> {
    let session = open_session(root)?;
    let snapshot = session.restore(id)?;
    println!("Restored {} from {}", session.document_path().display(), snapshot.id);
    Ok(())
}

/// Does not need the document, only the configured cache directory.
pub fn clear_cache(root: &Path) -> anyhow::Result<()> {
    let config = Config::load(root)?;
    let cache = GraphCache::open(config.cache_path(root))?;
    let removed = cache.clear()?;
    tracing::info!("Removed {} cached graphs from {}", removed, cache.dir().display());
    println!("Removed {removed} cached graphs");
    Ok(())
}
