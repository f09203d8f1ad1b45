//! Content sources
//!
//! A content source produces the rendered artifact for one display. The
//! refresh loop only depends on this trait; concrete implementations are
//! selected by name from the configuration (see [`registry`]).

use std::fmt;
use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

pub mod file;
pub mod http;
pub mod registry;

/// A fully rendered piece of display content.
///
/// The bytes are opaque to the engine; `content_type` is forwarded to HTTP
/// clients as-is. Cloning is cheap (`Bytes` is reference counted).
#[derive(Debug, Clone)]
pub struct Artifact {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Content production failures
///
/// All variants are treated uniformly by the refresh loop: log, wait out the
/// retry cooldown, try again. None of them is ever surfaced to HTTP clients.
#[derive(Debug)]
pub enum SourceError {
    /// Local I/O failed (reading a rendered file from disk)
    Io(std::io::Error),

    /// The upstream generator could not be reached or answered with an error
    Upstream(String),

    /// The source produced something unusable (empty body, bad settings)
    Invalid(String),
}

impl std::error::Error for SourceError {}

impl Display for SourceError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceError::Io(e) => write!(fmt, "io error: {}", e),
            SourceError::Upstream(e) => write!(fmt, "upstream error: {}", e),
            SourceError::Invalid(e) => write!(fmt, "invalid content: {}", e),
        }
    }
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self {
        SourceError::Io(e)
    }
}

/// Producer of rendered content for a single display.
///
/// `produce` may block on network or disk for a long time and may fail; the
/// refresh loop isolates both so one slow or broken display never affects
/// the others.
#[async_trait]
pub trait ContentSource: Send + Sync + fmt::Debug {
    /// How often this display wants its content regenerated
    fn refresh_interval(&self) -> Duration;

    /// Produce a fresh artifact
    async fn produce(&self) -> std::result::Result<Artifact, SourceError>;
}
