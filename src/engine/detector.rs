//! Content change detection
//!
//! Decides whether a freshly produced artifact warrants a new version. The
//! comparison itself is trivial per byte but artifacts can be large, so the
//! updater runs it through `spawn_blocking` (see [`changed_blocking`]) to
//! keep slow comparisons off the timer path.

use bytes::Bytes;

/// Returns true when `current` must be published under a new version.
///
/// An absent `previous` means this is the first cycle: a version must exist
/// before any HTTP read, so it always counts as changed.
pub fn changed(previous: Option<&[u8]>, current: &[u8]) -> bool {
    match previous {
        None => true,
        Some(previous) => previous != current,
    }
}

/// Compare on the blocking pool.
///
/// The handles are cheap clones; the actual byte comparison happens on a
/// worker thread so other displays' timers are never delayed by it.
pub async fn changed_blocking(previous: Option<Bytes>, current: Bytes) -> crate::Result<bool> {
    let result =
        tokio::task::spawn_blocking(move || changed(previous.as_deref(), &current)).await?;
    Ok(result)
}
