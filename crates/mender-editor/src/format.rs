//! Line-numbered rendering of document excerpts

/// Marker in front of a relevant line.
pub const MATCH_MARKER: &str = "→ ";
/// Marker in front of a context line.
pub const CONTEXT_MARKER: &str = "  ";

/// Render 1-based lines `start_line..=end_line` widened by `context_lines`
/// on each side, each as `<n>: <line>`. With `mark_relevant`, lines inside
/// the requested range are prefixed with `→ ` and context lines with two
/// spaces. Out-of-range bounds are clamped; an empty range renders as "".
pub fn format_lines(
    lines: &[&str],
    start_line: usize,
    end_line: usize,
    context_lines: usize,
    mark_relevant: bool,
) -> String {
    let relevant_start = start_line.saturating_sub(1);
    let relevant_end = end_line.min(lines.len());
    let context_start = relevant_start.saturating_sub(context_lines);
    let context_end = relevant_end.saturating_add(context_lines).min(lines.len());

    if context_start >= context_end {
        return String::new();
    }

    (context_start..context_end)
        .map(|i| {
            let numbered = format!("{}: {}", i + 1, lines[i]);
            if !mark_relevant {
                numbered
            } else if (relevant_start..relevant_end).contains(&i) {
                format!("{MATCH_MARKER}{numbered}")
            } else {
                format!("{CONTEXT_MARKER}{numbered}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
