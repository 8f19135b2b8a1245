//! Local-disk replica store
//!
//! Development and test backend. Entries live under a configured root
//! directory with the same relative layout the object-storage backend
//! uses for keys.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use crate::domain::{ReplicaError, Result};

use super::traits::ReplicaStore;

/// Replica store rooted at a local directory
pub struct LocalReplicaStore {
    root: PathBuf,
}

impl LocalReplicaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ReplicaStore for LocalReplicaStore {
    async fn list_file_names(&self, dir: &str) -> Result<Vec<String>> {
        let target = self.resolve(dir);
        let mut entries = match fs::read_dir(&target).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ReplicaError::ListFailed {
                    path: dir.to_string(),
                    message: e.to_string(),
                }
                .into())
            }
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| ReplicaError::ListFailed {
            path: dir.to_string(),
            message: e.to_string(),
        })? {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if is_file {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let target = self.resolve(path);
        fs::read(&target).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ReplicaError::NotFound(path.to_string()).into()
            } else {
                ReplicaError::ReadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                }
                .into()
            }
        })
    }

    async fn write_file(&self, path: &str, contents: &[u8]) -> Result<()> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ReplicaError::WriteFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                })?;
        }
        fs::write(&target, contents)
            .await
            .map_err(|e| ReplicaError::WriteFailed {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        debug!(path, bytes = contents.len(), "Wrote replica entry");
        Ok(())
    }

    async fn has_file(&self, path: &str) -> Result<bool> {
        Ok(fs::try_exists(self.resolve(path)).await.unwrap_or(false))
    }
}
