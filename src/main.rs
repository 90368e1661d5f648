//! match-sitemap - sitemap generator for a sports-streaming site.
//!
//! One invocation is one pass: fetch the match listing, keep the events that
//! are still current, and rewrite `sitemap.xml`. Scheduling is left to cron
//! or whatever runs the binary.

mod cli;
mod config;
mod filter;
mod generator;
mod logger;
mod source;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SitemapConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match &cli.command {
        Commands::Generate { args } => {
            let config = SitemapConfig::load(&cli)?;
            cli::generate::generate(args, &config)
        }
        Commands::Decode { id } => cli::decode::decode(id),
        Commands::Init { force } => {
            let cwd = std::env::current_dir()?;
            cli::init::write_config(&cwd, *force)
        }
    }
}
