//! Uniform tool result shape

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// One content item: `{"text": ...}` or `{"json": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentBlock {
    Text(String),
    Json(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub status: Status,
    pub content: Vec<ContentBlock>,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        ToolResult {
            status: Status::Success,
            content: vec![ContentBlock::Text(text.into())],
        }
    }

    pub fn texts(texts: impl IntoIterator<Item = String>) -> Self {
        ToolResult {
            status: Status::Success,
            content: texts.into_iter().map(ContentBlock::Text).collect(),
        }
    }

    pub fn json(value: serde_json::Value) -> Self {
        ToolResult {
            status: Status::Success,
            content: vec![ContentBlock::Json(value)],
        }
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        ToolResult {
            status: Status::Error,
            content: vec![ContentBlock::Text(format!("Error: {message}"))],
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Human-readable rendering: text blocks as-is, JSON blocks pretty-printed,
    /// separated by blank lines.
    pub fn render(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                ContentBlock::Text(text) => text.clone(),
                ContentBlock::Json(value) => {
                    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
