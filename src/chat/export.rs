//! Read-only transcript snapshots for download

use super::transcript::{Role, Turn};
use super::ChatError;
use serde::Serialize;
use std::str::FromStr;

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// One `ROLE: content` line per turn
    #[default]
    Text,
    /// Pretty-printed list of `{role, content}` records
    Json,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Text => "chat_history.txt",
            ExportFormat::Json => "chat_history.json",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            other => Err(ChatError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Serialize)]
struct ExportRecord<'a> {
    role: Role,
    content: &'a str,
}

/// Plain-text rendering: `USER: ...` / `ASSISTANT: ...`, newline-joined
pub fn to_plain_text<'a>(turns: impl Iterator<Item = &'a Turn>) -> String {
    turns
        .map(|t| format!("{}: {}", t.role().as_str().to_uppercase(), t.content()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty-printed JSON list of `{role, content}` in insertion order
pub fn to_json<'a>(turns: impl Iterator<Item = &'a Turn>) -> Result<String, ChatError> {
    let records: Vec<ExportRecord<'_>> = turns
        .map(|t| ExportRecord {
            role: t.role(),
            content: t.content(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

pub fn render<'a>(
    format: ExportFormat,
    turns: impl Iterator<Item = &'a Turn>,
) -> Result<String, ChatError> {
    match format {
        ExportFormat::Text => Ok(to_plain_text(turns)),
        ExportFormat::Json => to_json(turns),
    }
}
