//! File-backed content source
//!
//! Serves a pre-rendered image from the local filesystem. Useful when an
//! external renderer drops its output into a watched directory.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::{Artifact, ContentSource, SourceError};

#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    content_type: String,
    interval: Duration,
}

impl FileSource {
    pub fn new(path: PathBuf, content_type: String, interval: Duration) -> Self {
        Self { path, content_type, interval }
    }
}

#[async_trait]
impl ContentSource for FileSource {
    fn refresh_interval(&self) -> Duration {
        self.interval
    }

    async fn produce(&self) -> Result<Artifact, SourceError> {
        let bytes = tokio::fs::read(&self.path).await?;
        if bytes.is_empty() {
            return Err(SourceError::Invalid(format!(
                "{} is empty",
                self.path.display()
            )));
        }
        Ok(Artifact {
            bytes: Bytes::from(bytes),
            content_type: self.content_type.clone(),
        })
    }
}
