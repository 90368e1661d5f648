//! `[output]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [output]
//! path = "sitemap.xml"
//! minify = false
//! on_fetch_error = "partial"   # or "abort"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Behaviour when the match listing cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchErrorPolicy {
    /// Write a sitemap with the fixed pages only.
    #[default]
    Partial,
    /// Write nothing and exit with an error.
    Abort,
}

/// Sitemap output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file, overwritten on every run. `~` is expanded.
    pub path: PathBuf,

    /// Collapse the document onto a single line.
    pub minify: bool,

    pub on_fetch_error: FetchErrorPolicy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "sitemap.xml".into(),
            minify: false,
            on_fetch_error: FetchErrorPolicy::Partial,
        }
    }
}
