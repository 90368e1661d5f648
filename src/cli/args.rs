//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::FetchErrorPolicy;

/// Sports match sitemap generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: sitemap.toml, optional)
    #[arg(short = 'C', long, global = true, default_value = "sitemap.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Fetch current matches and regenerate the sitemap
    #[command(visible_alias = "g")]
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Decode a match identifier back into timestamp, sport and match name
    #[command(visible_alias = "d")]
    Decode {
        /// Identifier as found in `/Matchinformation/?id=...`
        id: String,
    },

    /// Write a default config file to the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

/// Generate command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Override the match-listing API endpoint
    #[arg(long, value_hint = clap::ValueHint::Url)]
    pub endpoint: Option<String>,

    /// Override the site base URL used in every <loc>
    #[arg(short = 'U', long = "base-url", value_hint = clap::ValueHint::Url)]
    pub base_url: Option<String>,

    /// Output file path
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Read the API payload from a local JSON file instead of fetching it
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Use this unix timestamp (seconds) as the current time
    #[arg(long, value_name = "UNIX_SECONDS")]
    pub now: Option<i64>,

    /// Print the sitemap to stdout instead of writing the output file
    #[arg(long)]
    pub stdout: bool,

    /// Minify the sitemap XML
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// What to do when the API cannot be fetched
    #[arg(long, value_enum)]
    pub on_fetch_error: Option<FetchErrorPolicy>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}
