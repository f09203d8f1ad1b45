//! Source factory
//!
//! Maps the `source` type tag from the configuration to a concrete
//! [`ContentSource`] constructor. Validation happens here, once, at load
//! time; the refresh loop never sees concrete source types.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::config::DisplayConfig;
use crate::source::file::FileSource;
use crate::source::http::HttpSource;
use crate::source::ContentSource;

const DEFAULT_FILE_CONTENT_TYPE: &str = "image/png";

/// Build the content source for one display from its configuration
///
/// Fails on an unknown type tag or missing settings so that a bad
/// configuration aborts startup instead of producing a dead display.
pub fn new_source(id: &str, cfg: &DisplayConfig) -> anyhow::Result<Box<dyn ContentSource>> {
    let interval = Duration::from_secs(cfg.update_every);
    match cfg.source.as_str() {
        "file" => {
            let path = cfg
                .path
                .as_ref()
                .with_context(|| format!("display {}: file source requires 'path'", id))?;
            let content_type = cfg
                .content_type
                .clone()
                .unwrap_or_else(|| DEFAULT_FILE_CONTENT_TYPE.to_string());
            Ok(Box::new(FileSource::new(
                PathBuf::from(path),
                content_type,
                interval,
            )))
        }
        "http" => {
            let url = cfg
                .url
                .as_ref()
                .with_context(|| format!("display {}: http source requires 'url'", id))?;
            Ok(Box::new(HttpSource::new(
                url.clone(),
                cfg.content_type.clone(),
                interval,
            )))
        }
        other => bail!("display {}: unknown source type '{}'", id, other),
    }
}
