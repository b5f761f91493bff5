// src/checker/limiter.rs
// =============================================================================
// Pacing gate: admits at most one probe start per fixed interval.
//
// Each caller reserves the next free start slot under a short lock, then
// sleeps until that slot outside the lock. Slots are handed out in strictly
// increasing order, so two admitted probes never start closer together than
// the interval, no matter how many tasks call admit() at once.
//
// The concurrency bound lives next to this in the scheduler, as a
// tokio Semaphore; the two gates are independent and a probe passes both.
// =============================================================================

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
pub struct RateGate {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Waits until this caller may start. A zero interval never waits.
    pub async fn admit(&self) {
        if self.interval.is_zero() {
            return;
        }

        let slot = {
            let mut next = self.next_slot.lock().unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            let slot = match *next {
                Some(reserved) if reserved > now => reserved,
                _ => now,
            };
            *next = Some(slot + self.interval);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}
