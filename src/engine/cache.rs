//! Status cache shared between the refresh engine and the HTTP layer
//!
//! The set of displays is fixed at startup, so the cache is a frozen map of
//! per-display slots. Each slot has exactly one writer (its display's
//! updater) and any number of readers; distinct displays never contend on a
//! shared lock.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::status::DisplayStatus;

type Slot = Arc<RwLock<Option<Arc<DisplayStatus>>>>;

/// Frozen map from display id to its status slot
#[derive(Clone)]
pub struct StatusCache {
    slots: Arc<HashMap<String, Slot>>,
}

impl StatusCache {
    /// Create one empty slot per configured display id
    pub fn new<I>(display_ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let slots = display_ids
            .into_iter()
            .map(|id| (id, Arc::new(RwLock::new(None)) as Slot))
            .collect();
        Self { slots: Arc::new(slots) }
    }

    /// Writer handle for one display, handed to its updater at startup.
    ///
    /// Returns None for ids that were not configured.
    pub fn slot(&self, display_id: &str) -> Option<StatusSlot> {
        self.slots
            .get(display_id)
            .map(|slot| StatusSlot { inner: slot.clone() })
    }

    /// Latest published status for a display, or None if the display is
    /// unknown or has not completed a successful cycle yet
    pub async fn read(&self, display_id: &str) -> Option<Arc<DisplayStatus>> {
        let slot = self.slots.get(display_id)?;
        slot.read().await.clone()
    }
}

/// Write handle to a single display's slot
#[derive(Clone)]
pub struct StatusSlot {
    inner: Slot,
}

impl StatusSlot {
    /// Replace the published status wholesale
    pub async fn publish(&self, status: DisplayStatus) {
        let mut slot = self.inner.write().await;
        *slot = Some(Arc::new(status));
    }

    pub async fn read(&self) -> Option<Arc<DisplayStatus>> {
        self.inner.read().await.clone()
    }
}
