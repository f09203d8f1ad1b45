//! Published display status

use rand::distr::Alphanumeric;
use rand::Rng;
use tokio::time::Instant;

use crate::source::Artifact;

/// Length of a minted version token
const VERSION_LEN: usize = 32;

/// The latest published state of one display.
///
/// Replaced wholesale on every publish; readers always see a complete,
/// self-consistent snapshot. `version` only changes when the artifact
/// content actually changed, which is what makes client-side caching work.
#[derive(Debug, Clone)]
pub struct DisplayStatus {
    /// Opaque content generation tag, served as the ETag
    pub version: String,

    /// The rendered content itself
    pub artifact: Artifact,

    /// When the next artifact is expected to be ready
    pub next_update: Instant,
}

/// Mint a fresh version token.
///
/// Random alphanumeric, long enough that a collision across refresh cycles
/// is negligible for the lifetime of any deployment. Not a secret.
pub fn mint_version() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(VERSION_LEN)
        .map(char::from)
        .collect()
}
