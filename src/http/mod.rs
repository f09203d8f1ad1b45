//! HTTP serving layer
//!
//! Serves the latest published content with conditional-GET semantics:
//! clients poll as often as `Cache-Control` tells them to and send back the
//! `ETag` they hold, so unchanged content is never re-downloaded.

mod handlers;
pub mod server;

pub use handlers::AppState;
pub use server::router;
