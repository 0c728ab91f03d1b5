// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every option can also come from an environment variable (the `env`
// attribute), which is handy in CI where the command line is fixed.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::checker::DEFAULT_MAX_REDIRECTS;
use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "locale-link-check",
    version,
    about = "Finds broken links inside localization files",
    long_about = "locale-link-check walks every translation of every locale, pulls out \
                  href=\"...\" links and checks that each one is well formed and reachable. \
                  It exits with 1 when a broken link is found, so it fits into CI pipelines."
)]
pub struct Cli {
    /// Increase log output on stderr (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every link in the selected locales
    ///
    /// Example: locale-link-check check --locales-dir config/locales --locale en
    Check(CheckArgs),

    /// List the locales found in the locales directory
    Locales {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Directory containing the locale files (.yml, .yaml, .json)
    #[arg(long, env = "LINK_CHECK_LOCALES_DIR", default_value = "config/locales")]
    pub locales_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Locale to check; repeat for several. Default: every locale found
    #[arg(long = "locale", value_name = "LOCALE")]
    pub locales: Vec<String>,

    /// Output results in JSON format instead of text
    #[arg(long)]
    pub json: bool,

    /// Redirects to follow per link before reporting it as broken
    #[arg(long, env = "LINK_CHECK_MAX_REDIRECTS", default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: usize,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, env = "LINK_CHECK_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// How many links to check at the same time
    #[arg(long, env = "LINK_CHECK_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// User-Agent header sent with each request
    #[arg(long, env = "LINK_CHECK_USER_AGENT")]
    pub user_agent: Option<String>,
}
