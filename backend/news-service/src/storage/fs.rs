use anyhow::{bail, Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::BlobStore;

/// Flat directory of blobs, one file per key.
///
/// Writes go to a uniquely named temp file in the same directory, are synced,
/// then renamed over the destination, so readers see the old or the new blob
/// and never a partial one.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create blob directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || key.starts_with('.')
            || key.contains(|c: char| c == '/' || c == '\\')
        {
            bail!("invalid blob key {:?}", key);
        }
        Ok(self.dir.join(key))
    }

    async fn write_temp(&self, temp: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(temp).await?;
        file.write_all(data).await?;
        file.sync_all().await
    }
}

#[async_trait::async_trait]
impl BlobStore for FsBlobStore {
    async fn store(&self, key: &str, data: &[u8]) -> Result<()> {
        let target = self.path_for(key)?;
        let temp = self.dir.join(format!(".{}.{}.tmp", key, Uuid::new_v4()));

        let written = match self.write_temp(&temp, data).await {
            Ok(()) => tokio::fs::rename(&temp, &target).await,
            Err(err) => Err(err),
        };

        if let Err(err) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&temp).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    tracing::warn!(path = %temp.display(), error = %cleanup, "Failed to remove temp blob");
                }
            }
            return Err(err).with_context(|| format!("BlobStore::store {}", target.display()));
        }

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("BlobStore::get {}", path.display())),
        }
    }
}
