// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Probe tuning flags live in their own struct (ProbeArgs) and are flattened
// into both subcommands, so `analyze` and `check` accept the same knobs.
// =============================================================================

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{
    ValidatorConfig, DEFAULT_CACHE_TTL_SECS, DEFAULT_CONCURRENCY, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_REDIRECTS, DEFAULT_MIN_INTERVAL_MS, DEFAULT_PROBE_TIMEOUT_MS,
    DEFAULT_RETRY_DELAY_MS,
};

#[derive(Parser, Debug)]
#[command(
    name = "page-probe",
    version,
    about = "Analyze a web page's HTML and check every link on it",
    long_about = "page-probe fetches one page, reports its doctype, title, headings and \
                  whether it has a login form, then checks every link it contains. \
                  Link checks are cached, retried, and rate limited."
)]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one page and validate its links
    ///
    /// Example: page-probe analyze https://example.com
    Analyze {
        /// Page URL to analyze (e.g., https://example.com/home)
        url: String,

        /// Output the report as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        probe: ProbeArgs,
    },

    /// Check a list of absolute URLs without analyzing a page
    ///
    /// Example: page-probe check https://example.com https://rust-lang.org
    Check {
        /// URLs to check
        #[arg(required = true)]
        urls: Vec<String>,

        /// Output results as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        probe: ProbeArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Maximum number of link checks running at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Minimum milliseconds between two link checks starting
    #[arg(long, default_value_t = DEFAULT_MIN_INTERVAL_MS)]
    pub min_interval_ms: u64,

    /// Seconds a link result stays cached
    #[arg(long, default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl_secs: u64,

    /// Per-request timeout for a link check, in milliseconds
    #[arg(long, default_value_t = DEFAULT_PROBE_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Redirects followed before a link counts as unreachable
    #[arg(long, default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: usize,

    /// Attempts per link, including the first
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Delay before the first retry, in milliseconds (doubles each retry)
    #[arg(long, default_value_t = DEFAULT_RETRY_DELAY_MS)]
    pub retry_delay_ms: u64,
}

impl From<ProbeArgs> for ValidatorConfig {
    fn from(args: ProbeArgs) -> Self {
        Self {
            concurrency: args.concurrency,
            min_interval: Duration::from_millis(args.min_interval_ms),
            cache_ttl: Duration::from_secs(args.cache_ttl_secs),
            probe_timeout: Duration::from_millis(args.timeout_ms),
            max_redirects: args.max_redirects,
            max_attempts: args.max_attempts,
            retry_base_delay: Duration::from_millis(args.retry_delay_ms),
            ..ValidatorConfig::default()
        }
    }
}
