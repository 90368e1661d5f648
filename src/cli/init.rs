//! Configuration file generation.
//!
//! Writes `sitemap.toml` with every default spelled out.

use crate::{
    config::{CONFIG_FILE, SitemapConfig},
    log,
};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Generate sitemap.toml content with a header comment.
pub fn generate_config_template() -> Result<String> {
    let body = toml::to_string_pretty(&SitemapConfig::default())
        .context("Failed to serialize default config")?;

    Ok(format!(
        "# match-sitemap configuration file (v{})\n\
         # Every value below is the built-in default; delete what you don't change.\n\n{}",
        env!("CARGO_PKG_VERSION"),
        body
    ))
}

/// Write the default config into `root`.
pub fn write_config(root: &Path, force: bool) -> Result<()> {
    let path = root.join(CONFIG_FILE);
    if path.exists() && !force {
        bail!(
            "'{}' already exists, use --force to overwrite",
            path.display()
        );
    }

    let content = generate_config_template()?;
    fs::write(&path, content)
        .with_context(|| format!("Failed to write config file '{}'", path.display()))?;

    log!("init"; "wrote {}", path.display());
    Ok(())
}
