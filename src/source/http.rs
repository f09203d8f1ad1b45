//! HTTP-backed content source
//!
//! Pulls a rendered image from an upstream generator over HTTP. The blocking
//! `ureq` client runs inside `spawn_blocking` so a slow upstream never stalls
//! the scheduler or the other displays.

use std::io::Read;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::{Artifact, ContentSource, SourceError};

/// Upstream responses larger than this are rejected as malformed
const MAX_BODY_SIZE: u64 = 32 * 1024 * 1024;

#[derive(Debug)]
pub struct HttpSource {
    url: String,
    interval: Duration,
    /// Overrides the upstream Content-Type when set
    content_type: Option<String>,
}

impl HttpSource {
    pub fn new(url: String, content_type: Option<String>, interval: Duration) -> Self {
        Self { url, interval, content_type }
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    fn refresh_interval(&self) -> Duration {
        self.interval
    }

    async fn produce(&self) -> Result<Artifact, SourceError> {
        let url = self.url.clone();
        let fetched = tokio::task::spawn_blocking(move || fetch(&url))
            .await
            .map_err(|e| SourceError::Upstream(format!("fetch task failed: {}", e)))??;

        let (bytes, upstream_type) = fetched;
        if bytes.is_empty() {
            return Err(SourceError::Invalid(format!("{} returned an empty body", self.url)));
        }

        let content_type = self
            .content_type
            .clone()
            .unwrap_or(upstream_type);
        Ok(Artifact { bytes: Bytes::from(bytes), content_type })
    }
}

fn fetch(url: &str) -> Result<(Vec<u8>, String), SourceError> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| SourceError::Upstream(e.to_string()))?;

    let content_type = response.content_type().to_string();
    let body = read_body(response.into_reader())?;
    Ok((body, content_type))
}

/// Read the full body, rejecting anything over the size limit.
///
/// Reads one byte past the limit so an oversized body is detected and
/// refused instead of being truncated and served as valid content.
fn read_body(reader: impl Read) -> Result<Vec<u8>, SourceError> {
    let mut body = Vec::new();
    reader.take(MAX_BODY_SIZE + 1).read_to_end(&mut body)?;
    if body.len() as u64 > MAX_BODY_SIZE {
        return Err(SourceError::Invalid(format!(
            "body exceeds the {} byte limit",
            MAX_BODY_SIZE
        )));
    }
    Ok(body)
}
