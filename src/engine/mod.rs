//! Refresh engine
//!
//! One updater task per display regenerates content on its own cadence and
//! publishes versioned snapshots into the status cache, which is the single
//! point of contact between the engine and the HTTP layer.

pub mod cache;
pub mod detector;
pub mod status;
pub mod updater;

pub use cache::{StatusCache, StatusSlot};
pub use status::DisplayStatus;
pub use updater::DisplayUpdater;
