//! JSON Export

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::{ChatMessage, KnowledgeItem};

#[derive(Serialize)]
struct VaultExport<'a> {
    exported_at: String,
    count: usize,
    items: &'a [KnowledgeItem],
}

/// Write knowledge items to a pretty-printed JSON file
pub fn write_knowledge(path: &Path, items: &[KnowledgeItem]) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let writer = BufWriter::new(file);
    let export = VaultExport {
        exported_at: chrono::Local::now().to_rfc3339(),
        count: items.len(),
        items,
    };
    serde_json::to_writer_pretty(writer, &export).context("serialize knowledge items")?;
    Ok(items.len())
}

#[derive(Serialize)]
struct ChatExport<'a> {
    exported_at: String,
    count: usize,
    messages: &'a [ChatMessage],
}

/// Write a chat transcript to a pretty-printed JSON file
pub fn write_chat(path: &Path, messages: &[ChatMessage]) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let writer = BufWriter::new(file);
    let export = ChatExport {
        exported_at: chrono::Local::now().to_rfc3339(),
        count: messages.len(),
        messages,
    };
    serde_json::to_writer_pretty(writer, &export).context("serialize chat transcript")?;
    Ok(messages.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChatRole;

    #[test]
    fn test_write_knowledge_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("vault.json");
        let items = KnowledgeItem::seed();
        write_knowledge(&path, &items).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["count"], items.len());
        assert_eq!(value["items"][2]["url"], "https://example.com/neural-sync");
    }

    #[test]
    fn test_write_chat_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("chat.json");
        let messages = vec![
            ChatMessage::new(1, ChatRole::User, "hi"),
            ChatMessage::new(2, ChatRole::Assistant, "hello"),
        ];
        assert_eq!(write_chat(&path, &messages).unwrap(), 2);

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["messages"][1]["role"], "assistant");
        assert_eq!(value["messages"][0]["text"], "hi");
    }
}
