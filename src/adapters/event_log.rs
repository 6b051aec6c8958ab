use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Appends every raw stream event to a file for later inspection.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, event: &serde_json::Value) -> Result<()> {
        let mut entry = serde_json::to_string(event)?;
        entry.push_str("\n\n\n");

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        // tokio hands the write to a blocking task; flush to surface its result.
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_append_separates_entries() {
        let dir = TempDir::new().unwrap();
        let log = EventLog::new(dir.path().join("b.out"));

        log.append(&json!({"e": "ACCOUNT_UPDATE"})).await.unwrap();
        log.append(&json!({"e": "ORDER_TRADE_UPDATE", "note": "체결"}))
            .await
            .unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            content,
            "{\"e\":\"ACCOUNT_UPDATE\"}\n\n\n{\"e\":\"ORDER_TRADE_UPDATE\",\"note\":\"체결\"}\n\n\n"
        );
    }

    #[tokio::test]
    async fn test_append_keeps_field_order() {
        let dir = TempDir::new().unwrap();
        let log = EventLog::new(dir.path().join("b.out"));
        let frame = r#"{"e":"ORDER_TRADE_UPDATE","T":2,"E":1,"o":{"s":"BTCUSDT","S":"BUY"}}"#;

        let event: serde_json::Value = serde_json::from_str(frame).unwrap();
        log.append(&event).await.unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, format!("{}\n\n\n", frame));
    }
}
