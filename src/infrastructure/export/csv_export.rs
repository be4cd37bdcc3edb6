//! CSV Export

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::KnowledgeItem;

/// Write knowledge items to a CSV file
pub fn write_knowledge(path: &Path, items: &[KnowledgeItem]) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("open {}", path.display()))?;

    wtr.write_record(["id", "title", "content", "tags", "timestamp", "type", "url"])?;

    for item in items {
        wtr.write_record([
            item.id.clone(),
            item.title.clone(),
            item.content.clone(),
            item.tags.join(";"),
            item.timestamp.to_rfc3339(),
            item.kind.clone().unwrap_or_default(),
            item.url.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(items.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_knowledge_csv() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("vault.csv");
        let items = KnowledgeItem::seed();
        let count = write_knowledge(&path, &items).unwrap();
        assert_eq!(count, items.len());

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), items.len());
        assert_eq!(&rows[0][0], "k1");
        assert_eq!(&rows[0][3], "mesh;agents");
    }
}
