use crate::domain::ports::{AuditSink, StoreResult};
use crate::error::PersistenceError;
use async_trait::async_trait;
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Appends `<timestamp> : <entry>` lines to a text file, creating it on the
/// first write.
pub struct FileAuditLog {
    path: PathBuf,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditSink for FileAuditLog {
    async fn record(&self, entry: &str) -> StoreResult<()> {
        let audit_err = |source| PersistenceError::Audit {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(audit_err)?;

        let line = format!("{} : {}\n", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"), entry);
        file.write_all(line.as_bytes()).await.map_err(audit_err)?;
        file.flush().await.map_err(audit_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_appends_timestamped_lines() {
        let dir = tempdir().unwrap();
        let log = FileAuditLog::new(dir.path().join("audit.txt"));

        log.record("Item A1 : Chips CREATED.").await.unwrap();
        log.record("Item A1 : Chips DELETED.").await.unwrap();

        let text = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" : Item A1 : Chips CREATED."));
        assert!(lines[1].ends_with(" : Item A1 : Chips DELETED."));
    }

    #[tokio::test]
    async fn test_unwritable_path_is_audit_error() {
        let dir = tempdir().unwrap();
        let log = FileAuditLog::new(dir.path().join("no_such_dir").join("audit.txt"));

        let result = log.record("entry").await;
        assert!(matches!(result, Err(PersistenceError::Audit { .. })));
    }
}
