//! Reference graph index over an OpenAPI-style schema document

pub mod document;
pub mod refs;
pub mod builder;
pub mod index;


pub use document::{parse_document, render_document, key_to_string};
pub use refs::{extract_refs, REF_KEY};
pub use builder::build_full_graph;
pub use index::SchemaGraphIndex;
