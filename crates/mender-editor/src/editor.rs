//! Preview, search, replace and insert over the on-disk document

use crate::format::format_lines;
use crate::matcher::LineMatcher;
use mender_core::fs::{atomic_write, read_text};
use mender_core::{Error, Result, unified_diff};
use std::path::{Path, PathBuf};

/// Diff header for the pre-edit content.
pub const DIFF_FROM: &str = "Original";
/// Diff header for the post-edit content.
pub const DIFF_TO: &str = "Modified";

/// Default number of lines shown by an unbounded preview.
pub const DEFAULT_PREVIEW_LINES: usize = 50;

/// Stateless line editor bound to one document path.
#[derive(Debug, Clone)]
pub struct LineEditor {
    document_path: PathBuf,
    preview_lines: usize,
}

/// Document text split into lines, remembering whether it ended with a newline.
struct Lines {
    text: String,
    trailing_newline: bool,
}

impl Lines {
    fn read(path: &Path) -> Result<Self> {
        let text = read_text(path)?;
        let trailing_newline = text.ends_with('\n');
        Ok(Lines { text, trailing_newline })
    }

    fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }

    /// Join edited lines back into file content.
    fn render(&self, lines: &[&str]) -> String {
        let mut out = lines.join("\n");
        if self.trailing_newline && !lines.is_empty() {
            out.push('\n');
        }
        out
    }
}

impl LineEditor {
    /// Bind to `document_path`. Fails if the document does not exist.
    pub fn new(document_path: impl Into<PathBuf>) -> Result<Self> {
        let document_path = document_path.into();
        if !document_path.is_file() {
            return Err(Error::not_found(format!(
                "Schema file not found: {}",
                document_path.display()
            )));
        }
        Ok(LineEditor {
            document_path,
            preview_lines: DEFAULT_PREVIEW_LINES,
        })
    }

    pub fn with_preview_lines(mut self, preview_lines: usize) -> Self {
        self.preview_lines = preview_lines;
        self
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    /// Show an inclusive 1-based line range, or the first lines of the
    /// document followed by a `... N more lines ...` marker when neither
    /// bound is given.
    pub fn preview(&self, start_line: Option<usize>, end_line: Option<usize>) -> Result<String> {
        let doc = Lines::read(&self.document_path)?;
        let lines = doc.lines();

        match (start_line, end_line) {
            (Some(start), Some(end)) => Ok(format_lines(&lines, start, end, 0, false)),
            (None, None) => {
                let shown = self.preview_lines.min(lines.len());
                let skipped = lines.len() - shown;
                let mut out = format_lines(&lines, 1, shown, 0, false);
                if skipped > 0 {
                    out.push_str(&format!("\n... {skipped} more lines ..."));
                }
                Ok(out)
            }
            _ => Err(Error::invalid(
                "`start_line` and `end_line` must be specified together",
            )),
        }
    }

    /// One block per matching line, with `context_lines` around it. Matching
    /// lines are marked `→ `. No matches is an empty list, not an error.
    pub fn search(&self, matcher: &LineMatcher, context_lines: usize) -> Result<Vec<String>> {
        let doc = Lines::read(&self.document_path)?;
        let lines = doc.lines();

        let blocks: Vec<String> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| matcher.is_match(line))
            .map(|(i, _)| format_lines(&lines, i + 1, i + 1, context_lines, true))
            .collect();

        tracing::debug!("Search found {} matching lines", blocks.len());
        Ok(blocks)
    }

    /// Replace every occurrence across the whole document (literal matches
    /// may span lines). Returns the diff; an empty diff means nothing matched
    /// and the file was left untouched.
    pub fn replace(&self, matcher: &LineMatcher, new_str: &str, context_lines: usize) -> Result<String> {
        if let LineMatcher::Literal(old) = matcher {
            if old.is_empty() {
                return Err(Error::invalid("`old_str` must not be empty"));
            }
        }

        let doc = Lines::read(&self.document_path)?;
        let original = doc.lines();
        let joined = original.join("\n");
        let modified_text = matcher.replace_all(&joined, new_str);

        if modified_text == joined {
            tracing::debug!("Replace matched nothing in {}", self.document_path.display());
            return Ok(String::new());
        }

        let modified: Vec<&str> = modified_text.lines().collect();
        atomic_write(&self.document_path, doc.render(&modified).as_bytes())?;
        tracing::info!("Replaced text in {}", self.document_path.display());

        Ok(unified_diff(&original, &modified, context_lines, DIFF_FROM, DIFF_TO))
    }

    /// Insert `new_str` (one or more lines) after 1-based line `insert_line`;
    /// 0 inserts at the top and values past the end append.
    pub fn insert(&self, insert_line: usize, new_str: &str, context_lines: usize) -> Result<String> {
        let doc = Lines::read(&self.document_path)?;
        let original = doc.lines();
        let at = insert_line.min(original.len());

        let mut modified: Vec<&str> = Vec::with_capacity(original.len() + 1);
        modified.extend_from_slice(&original[..at]);
        modified.extend(new_str.split('\n'));
        modified.extend_from_slice(&original[at..]);

        atomic_write(&self.document_path, doc.render(&modified).as_bytes())?;
        tracing::info!(
            "Inserted {} lines after line {} in {}",
            modified.len() - original.len(),
            at,
            self.document_path.display()
        );

        Ok(unified_diff(&original, &modified, context_lines, DIFF_FROM, DIFF_TO))
    }
}
