//! Tool-call surface over the editor, graph index and snapshot history
//!
//! Results are uniform `{status, content}` values; failures inside a call are
//! reported as error results instead of being returned as `Err`, so a hosting
//! session survives a single bad call.

pub mod result;
pub mod call;
pub mod handlers;
pub mod session;


pub use result::{ContentBlock, Status, ToolResult};
pub use call::{EditorCommand, SchemaEditorArgs, ToolCall};
pub use session::Session;
