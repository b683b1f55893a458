/// Blob storage for news attachments
///
/// Each attachment kind has its own store; keys are `{news_id}.{ext}`.
pub mod fs;

pub use fs::FsBlobStore;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `data` under `key`, fully replacing any previous blob.
    async fn store(&self, key: &str, data: &[u8]) -> Result<()>;

    /// Read the blob under `key`, `None` if it was never stored.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

/// Attachment kinds a news item can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobKind {
    Audio,
    Image,
    Video,
}

impl BlobKind {
    pub const ALL: [BlobKind; 3] = [BlobKind::Audio, BlobKind::Image, BlobKind::Video];

    pub fn extension(self) -> &'static str {
        match self {
            BlobKind::Audio => "wav",
            BlobKind::Image => "png",
            BlobKind::Video => "mp4",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            BlobKind::Audio => "audio/x-wav",
            BlobKind::Image => "image/png",
            BlobKind::Video => "video/mp4",
        }
    }

    /// Directory name and metrics label
    pub fn as_str(self) -> &'static str {
        match self {
            BlobKind::Audio => "audio",
            BlobKind::Image => "image",
            BlobKind::Video => "video",
        }
    }

    pub fn key_for(self, news_id: i64) -> String {
        format!("{}.{}", news_id, self.extension())
    }
}

/// One store per attachment kind
#[derive(Clone)]
pub struct MediaBlobs {
    audio: Arc<dyn BlobStore>,
    image: Arc<dyn BlobStore>,
    video: Arc<dyn BlobStore>,
}

impl MediaBlobs {
    pub fn new(
        audio: Arc<dyn BlobStore>,
        image: Arc<dyn BlobStore>,
        video: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            audio,
            image,
            video,
        }
    }

    /// Filesystem stores under `root/{audio,image,video}`, creating the
    /// directories if needed.
    pub async fn open_dir(root: &Path) -> Result<Self> {
        Ok(Self::new(
            Arc::new(FsBlobStore::open(root.join(BlobKind::Audio.as_str())).await?),
            Arc::new(FsBlobStore::open(root.join(BlobKind::Image.as_str())).await?),
            Arc::new(FsBlobStore::open(root.join(BlobKind::Video.as_str())).await?),
        ))
    }

    pub fn store_for(&self, kind: BlobKind) -> &dyn BlobStore {
        match kind {
            BlobKind::Audio => self.audio.as_ref(),
            BlobKind::Image => self.image.as_ref(),
            BlobKind::Video => self.video.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_use_kind_extension() {
        assert_eq!(BlobKind::Audio.key_for(12), "12.wav");
        assert_eq!(BlobKind::Image.key_for(12), "12.png");
        assert_eq!(BlobKind::Video.key_for(12), "12.mp4");
    }

    #[test]
    fn content_types() {
        assert_eq!(BlobKind::Audio.content_type(), "audio/x-wav");
        assert_eq!(BlobKind::Image.content_type(), "image/png");
        assert_eq!(BlobKind::Video.content_type(), "video/mp4");
    }

    #[tokio::test]
    async fn open_dir_creates_one_directory_per_kind() {
        let root = tempfile::tempdir().unwrap();
        let blobs = MediaBlobs::open_dir(root.path()).await.unwrap();

        for kind in BlobKind::ALL {
            assert!(root.path().join(kind.as_str()).is_dir());
        }

        blobs
            .store_for(BlobKind::Image)
            .store("3.png", b"png")
            .await
            .unwrap();
        assert!(root.path().join("image").join("3.png").is_file());
        assert!(blobs
            .store_for(BlobKind::Audio)
            .get("3.png")
            .await
            .unwrap()
            .is_none());
    }
}
