//! Per-display refresh loop
//!
//! Each display gets one updater task that runs for the lifetime of the
//! process: produce content, detect whether it changed, publish a versioned
//! status, sleep until the next cycle. Any failure is logged and answered
//! with a cooldown retry; the previously published status keeps being
//! served untouched.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::engine::cache::StatusSlot;
use crate::engine::detector;
use crate::engine::status::{mint_version, DisplayStatus};
use crate::source::{Artifact, ContentSource};

/// Clients are told to come back this long after the next expected cycle,
/// absorbing content-generation latency
const TIME_MARGIN: Duration = Duration::from_secs(20);

/// Wait after a failed cycle before trying again
const RETRY_COOLDOWN: Duration = Duration::from_secs(60);

pub struct DisplayUpdater {
    id: String,
    source: Box<dyn ContentSource>,
    slot: StatusSlot,
    cancel: CancellationToken,
    /// Version and artifact of the last publish; carried across cycles so
    /// unchanged content keeps its version
    held: Option<(String, Artifact)>,
}

impl DisplayUpdater {
    pub fn new(
        id: String,
        source: Box<dyn ContentSource>,
        slot: StatusSlot,
        cancel: CancellationToken,
    ) -> Self {
        Self { id, source, slot, cancel, held: None }
    }

    /// Run until cancelled. Never returns an error; failures stay inside
    /// the loop.
    pub async fn run(mut self) {
        let interval = self.source.refresh_interval();
        loop {
            let cancel = self.cancel.clone();
            let wait = tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.refresh_once() => match result {
                    Ok(()) => interval,
                    Err(e) => {
                        tracing::error!(
                            "display {}: refresh failed: {}, retrying in {}s",
                            self.id, e, RETRY_COOLDOWN.as_secs()
                        );
                        RETRY_COOLDOWN
                    }
                }
            };

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }
        }
        tracing::info!("display {}: updater stopped", self.id);
    }

    /// One produce/detect/publish cycle.
    ///
    /// On success the full status triple is published, reusing the previous
    /// version when the content did not change. On failure nothing is
    /// published and the held state is left as it was.
    pub async fn refresh_once(&mut self) -> crate::Result<()> {
        tracing::info!("display {}: refreshing content", self.id);
        let fresh = self.source.produce().await?;

        let previous = self.held.as_ref().map(|(_, artifact)| artifact.bytes.clone());
        let changed = detector::changed_blocking(previous, fresh.bytes.clone()).await?;

        let (version, artifact) = match (changed, self.held.take()) {
            (false, Some(held)) => held,
            _ => {
                let version = mint_version();
                tracing::info!("display {}: content changed, version {}", self.id, version);
                (version, fresh)
            }
        };

        let next_update = Instant::now() + self.source.refresh_interval() + TIME_MARGIN;
        self.held = Some((version.clone(), artifact.clone()));
        self.slot
            .publish(DisplayStatus { version, artifact, next_update })
            .await;
        Ok(())
    }
}
