// src/checker/scheduler.rs
// =============================================================================
// Validates a batch of URLs under two limits at once:
// - at most `concurrency` probes in flight (a tokio Semaphore)
// - at most one new probe per `min_interval` (the RateGate)
//
// For each URL:
// 1. Cache hit  -> answer immediately, no slot and no pacing consumed
// 2. Cache miss -> take a slot, look in the cache once more (a duplicate
//    may have just finished), wait for pacing, probe, store, answer
//
// The batch is a fan-out/fan-in barrier: validate_all() returns only once
// every URL has a result. It never fails; per-link trouble is data.
//
// Rust concepts:
// - Arc: the cache is shared with the rest of the process
// - RAII permits: the slot is released when `_permit` drops, on every path
// - join_all: runs all futures concurrently and collects them in input order
// =============================================================================

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::cache::ResultCache;
use super::http::{ProbeExecutor, Transport, ValidationResult};
use super::limiter::RateGate;
use crate::config::ValidatorConfig;

pub struct ValidationScheduler<T> {
    executor: ProbeExecutor<T>,
    cache: Arc<ResultCache>,
    slots: Semaphore,
    pacing: RateGate,
}

impl<T: Transport> ValidationScheduler<T> {
    pub fn new(executor: ProbeExecutor<T>, cache: Arc<ResultCache>, config: &ValidatorConfig) -> Self {
        Self {
            executor,
            cache,
            slots: Semaphore::new(config.concurrency.max(1)),
            pacing: RateGate::new(config.min_interval),
        }
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Returns one result per input URL, in input order.
    pub async fn validate_all(&self, urls: &[String]) -> Vec<ValidationResult> {
        if urls.is_empty() {
            return Vec::new();
        }

        info!("Validating {} link(s)", urls.len());
        let results = join_all(urls.iter().map(|url| self.validate_one(url))).await;

        let unreachable = results.iter().filter(|r| !r.reachable).count();
        info!(
            total = results.len(),
            unreachable,
            cached = self.cache.len(),
            "Validation finished"
        );
        results
    }

    async fn validate_one(&self, url: &str) -> ValidationResult {
        if let Some(hit) = self.cache.get(url) {
            debug!(url, "cache hit");
            return hit;
        }

        let _permit = match self.slots.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                // Only happens if the semaphore is closed, which we never do
                warn!(url, "probe slots closed, skipping probe");
                return ValidationResult::unavailable(url);
            }
        };

        if let Some(hit) = self.cache.get(url) {
            debug!(url, "cache hit after waiting for a slot");
            return hit;
        }

        self.pacing.admit().await;

        debug!(url, "probing");
        let result = self.executor.probe(url).await;
        self.cache.put(url, result.clone());
        result
    }
}
