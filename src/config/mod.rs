//! Generator configuration for `sitemap.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── source     # [source]
//! │   ├── site       # [site]
//! │   ├── retention  # [retention]
//! │   └── output     # [output]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # SitemapConfig (this file)
//! ```
//!
//! The config file is optional. Every field has a built-in default, the file
//! overrides the defaults, and `generate` flags override the file. The
//! resulting value is built once at startup and passed by reference.

pub mod section;
pub mod types;
mod util;

use util::{expand_tilde, find_config_file};

pub use section::{FetchErrorPolicy, OutputConfig, RetentionConfig, SiteConfig, SourceConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands, GenerateArgs},
    debug, log,
};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config filename
pub const CONFIG_FILE: &str = "sitemap.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing sitemap.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Config file this value was loaded from, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Match-listing API
    #[serde(default)]
    pub source: SourceConfig,

    /// Site layout and fixed pages
    #[serde(default)]
    pub site: SiteConfig,

    /// Staleness windows
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl SitemapConfig {
    /// Load configuration for the given CLI invocation.
    ///
    /// A missing `sitemap.toml` means built-in defaults. A missing file that
    /// was named explicitly with `--config` is an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        crate::logger::set_verbose(Self::verbose_requested(cli));

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None if cli.config != Path::new(CONFIG_FILE) => {
                bail!(ConfigError::Io(
                    cli.config.clone(),
                    std::io::Error::from(std::io::ErrorKind::NotFound),
                ));
            }
            None => {
                debug!("config"; "no {} found, using built-in defaults", CONFIG_FILE);
                Self::default()
            }
        };

        if let Commands::Generate { args } = &cli.command {
            config.apply_generate_args(args);
        }
        config.finalize();
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        // Runs unattended from a scheduler, so warn instead of prompting
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// `--verbose` must take effect before the config file lookup logs.
    fn verbose_requested(cli: &Cli) -> bool {
        matches!(&cli.command, Commands::Generate { args } if args.verbose)
    }

    /// Apply generate arguments from CLI.
    fn apply_generate_args(&mut self, args: &GenerateArgs) {
        Self::update_option(&mut self.source.endpoint, args.endpoint.as_ref());
        Self::update_option(&mut self.site.base_url, args.base_url.as_ref());
        Self::update_option(&mut self.output.path, args.output.as_ref());
        Self::update_option(&mut self.output.minify, args.minify.as_ref());
        Self::update_option(
            &mut self.output.on_fetch_error,
            args.on_fetch_error.as_ref(),
        );
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize values after all overrides are applied.
    fn finalize(&mut self) {
        self.retention.normalize();
        self.output.path = expand_tilde(&self.output.path);
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.source.validate(&mut diag);
        self.site.validate(&mut diag);
        self.retention.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SitemapConfig {
    let (parsed, ignored) = SitemapConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
