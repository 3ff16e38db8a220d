//! Line-oriented text diffs

use similar::TextDiff;

/// Unified diff between two line lists (lines without terminators).
///
/// Returns an empty string when the inputs are identical. The output carries
/// `--- <from>` / `+++ <to>` headers and has no trailing newline.
pub fn unified_diff(old: &[&str], new: &[&str], context_lines: usize, from: &str, to: &str) -> String {
    let diff = TextDiff::from_slices(old, new);
    let unified = diff
        .unified_diff()
        .context_radius(context_lines)
        .header(from, to)
        .to_string();
    unified.trim_end_matches('\n').to_string()
}

/// Keep the first `head` and last `tail` lines of `text`, replacing the
/// middle with a `... N more lines skipped ...` marker.
pub fn elide_lines(text: &str, head: usize, tail: usize) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    if head + tail >= lines.len() {
        return text.to_string();
    }

    let skipped = lines.len() - head - tail;
    let mut out: Vec<String> = lines[..head].iter().map(|l| l.to_string()).collect();
    out.push(format!("... {skipped} more lines skipped ..."));
    out.extend(lines[lines.len() - tail..].iter().map(|l| l.to_string()));
    out.join("\n")
}
