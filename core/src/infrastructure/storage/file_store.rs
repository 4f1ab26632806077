use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::error;

use crate::domain::{common::entities::app_errors::CoreError, library::ports::KeyValueStore};

/// Key-value store keeping one JSON file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    pub dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, CoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CoreError::InvalidConfig(format!(
                "invalid storage key '{}'",
                key
            )));
        }

        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.path_for(key)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                Err(CoreError::StorageRead(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");

        let write = async {
            tokio::fs::create_dir_all(&self.dir).await?;
            tokio::fs::write(&tmp_path, value.as_bytes()).await?;
            tokio::fs::rename(&tmp_path, &path).await
        };

        write.await.map_err(|e| {
            error!("Failed to write {}: {}", path.display(), e);
            CoreError::StorageWrite(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        let path = self.path_for(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Failed to remove {}: {}", path.display(), e);
                Err(CoreError::StorageWrite(format!(
                    "Failed to remove {}: {}",
                    path.display(),
                    e
                )))
            }
        }
    }
}
