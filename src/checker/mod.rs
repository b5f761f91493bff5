// src/checker/mod.rs
// =============================================================================
// This module contains the link validation pipeline.
//
// Submodules:
// - classify: Decides whether a link is internal, external, or ignored
// - cache: Remembers recent probe results for a fixed time window
// - http: Probes one URL over HTTP, retrying transient failures
// - limiter: Paces how fast new probes may start
// - scheduler: Runs a batch of probes under concurrency and pacing limits
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod cache;
mod classify;
mod http;
mod limiter;
mod scheduler;

// Re-export public items from submodules
// This lets users write `checker::ResultCache` instead of
// `checker::cache::ResultCache`
pub use cache::ResultCache;
pub use classify::LinkClassifier;
pub use http::{HttpTransport, ProbeExecutor, ProbeStatus, RetryPolicy, ValidationResult};
pub use scheduler::ValidationScheduler;
