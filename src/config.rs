// src/config.rs
// =============================================================================
// Tunables for the link-validation pipeline.
//
// Every value has a default; the CLI (src/cli.rs) overrides them from flags.
// One ValidatorConfig is built per process and handed to the prober,
// the scheduler and the result cache when they are created.
// =============================================================================

use std::time::Duration;

use crate::error::{AnalyzeError, Result};

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 100;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_MAX_REDIRECTS: usize = 5;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 100;
pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Maximum number of probes in flight at once
    pub concurrency: usize,
    /// Minimum spacing between two probe starts
    pub min_interval: Duration,
    /// How long a cached result stays fresh
    pub cache_ttl: Duration,
    /// Per-request timeout for a single probe attempt
    pub probe_timeout: Duration,
    /// Redirect hops followed before the attempt counts as failed
    pub max_redirects: usize,
    /// Total attempts per probe, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each attempt after
    pub retry_base_delay: Duration,
    /// Timeout for fetching the page under analysis
    pub page_timeout: Duration,
    pub user_agent: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            min_interval: Duration::from_millis(DEFAULT_MIN_INTERVAL_MS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            page_timeout: Duration::from_secs(DEFAULT_PAGE_TIMEOUT_SECS),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ValidatorConfig {
    /// Rejects settings the scheduler cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(AnalyzeError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(AnalyzeError::Config(
                "max attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
