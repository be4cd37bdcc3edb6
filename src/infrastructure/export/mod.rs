//! Knowledge vault and chat transcript export
//!
//! - JSON keeps the full item shape
//! - CSV flattens tags into a `;`-joined column
//! - Files are timestamped and written into the configured export directory

mod csv_export;
mod json_export;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::domain::{ChatMessage, KnowledgeItem};

pub use csv_export::write_knowledge as write_knowledge_csv;
pub use json_export::{write_chat as write_chat_json, write_knowledge as write_knowledge_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Generate a timestamped filename
fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Write `items` into `dir`, creating it if needed. Returns the file path.
pub fn export_knowledge(
    dir: &Path,
    items: &[KnowledgeItem],
    format: ExportFormat,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("create export directory {}", dir.display()))?;
    let path = dir.join(generate_filename("knowledge", format.extension()));
    match format {
        ExportFormat::Json => write_knowledge_json(&path, items)?,
        ExportFormat::Csv => write_knowledge_csv(&path, items)?,
    };
    tracing::info!(path = %path.display(), items = items.len(), "exported knowledge vault");
    Ok(path)
}

/// Write a chat transcript as `chat-<stamp>.json` into `dir`.
pub fn export_chat(dir: &Path, messages: &[ChatMessage]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("create export directory {}", dir.display()))?;
    let path = dir.join(generate_filename("chat", ExportFormat::Json.extension()));
    write_chat_json(&path, messages)?;
    tracing::info!(path = %path.display(), messages = messages.len(), "exported chat transcript");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_creates_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("exports");
        let path = export_knowledge(&dir, &KnowledgeItem::seed(), ExportFormat::Csv).unwrap();
        assert!(path.starts_with(&dir));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));
        assert!(path.exists());
    }
}
