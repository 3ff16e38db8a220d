//! Line-addressable editing of a single document
//!
//! Every call re-reads the document from disk; nothing is cached between
//! calls. Mutations return a unified diff of the change.

pub mod format;
pub mod matcher;
pub mod editor;

#[cfg(test)]
mod tests;

pub use editor::LineEditor;
pub use matcher::LineMatcher;
pub use format::format_lines;
