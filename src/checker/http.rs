// src/checker/http.rs
// =============================================================================
// This module checks if a URL is reachable by making HTTP requests.
//
// Key functionality:
// - Makes one HTTP GET per attempt (with a timeout and a redirect limit)
// - Retries transient failures (timeouts, connection errors, 5xx) with
//   exponential backoff, up to a fixed number of attempts
// - Never returns an error: every outcome becomes a ValidationResult
//
// The retry logic is a small state machine (RetryState) driven by
// RetryPolicy::advance, so it can be tested without any network at all.
// The network itself sits behind the Transport trait.
//
// Rust concepts:
// - Traits: Transport lets tests swap in a fake HTTP layer
// - Enums: To represent retry states and status values
// - impl Future in traits: async methods on a trait
// =============================================================================

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::config::ValidatorConfig;
use crate::error::TransportFailure;

// What a probe learned about a URL's status
//
// Serialized as the number itself, or "N/A" when no response ever arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Code(u16),
    Unavailable,
}

impl Serialize for ProbeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProbeStatus::Code(code) => serializer.serialize_u16(*code),
            ProbeStatus::Unavailable => serializer.serialize_str("N/A"),
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Code(code) => write!(f, "{}", code),
            ProbeStatus::Unavailable => write!(f, "N/A"),
        }
    }
}

// Represents the result of checking a single link
//
// `reachable` is true whenever the server answered, even with 404 or 500.
// Only transport failures (timeout, DNS, refused, redirect loop) make it false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// The absolute URL that was checked
    pub link: String,
    pub status: ProbeStatus,
    pub reachable: bool,
}

impl ValidationResult {
    pub fn responded(link: &str, code: u16) -> Self {
        Self {
            link: link.to_string(),
            status: ProbeStatus::Code(code),
            reachable: true,
        }
    }

    pub fn unavailable(link: &str) -> Self {
        Self {
            link: link.to_string(),
            status: ProbeStatus::Unavailable,
            reachable: false,
        }
    }
}

/// One HTTP attempt: the response status code, or why there was none.
pub trait Transport {
    fn attempt(&self, url: &str) -> impl Future<Output = Result<u16, TransportFailure>> + Send;
}

// The real transport, backed by a shared reqwest client
//
// Client is cheap to clone (it's just a reference counter internally),
// so every probe reuses one connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ValidatorConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.probe_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn attempt(&self, url: &str) -> Result<u16, TransportFailure> {
        // Only the status line matters; the body is dropped unread
        let response = self.client.get(url).send().await?;
        Ok(response.status().as_u16())
    }
}

// Where a probe is in its retry loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryState {
    /// About to make attempt n (1-based)
    Attempting(u32),
    Succeeded(ValidationResult),
    Exhausted(ValidationResult),
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ValidatorConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.retry_base_delay,
        }
    }

    /// Delay to wait before making `attempt`. Nothing before the first one,
    /// then base, 2 x base, 4 x base, ...
    pub fn backoff(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(attempt - 2).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Moves the state machine forward after `attempt` produced `outcome`.
    pub fn advance(
        &self,
        url: &str,
        attempt: u32,
        outcome: Result<u16, TransportFailure>,
    ) -> RetryState {
        let attempts_left = attempt < self.max_attempts;

        match outcome {
            Ok(code) if (500..600).contains(&code) => {
                if attempts_left {
                    debug!(url, attempt, code, "server error, retrying");
                    RetryState::Attempting(attempt + 1)
                } else {
                    // The server did answer, so keep the code as data
                    warn!(url, attempt, code, "server error on final attempt");
                    RetryState::Exhausted(ValidationResult::responded(url, code))
                }
            }
            Ok(code) => RetryState::Succeeded(ValidationResult::responded(url, code)),
            Err(failure) if failure.is_transient() && attempts_left => {
                debug!(url, attempt, %failure, "transient failure, retrying");
                RetryState::Attempting(attempt + 1)
            }
            Err(failure) => {
                warn!(url, attempt, %failure, "link unreachable");
                RetryState::Exhausted(ValidationResult::unavailable(url))
            }
        }
    }
}

// Runs the retry state machine against a transport
#[derive(Debug, Clone)]
pub struct ProbeExecutor<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> ProbeExecutor<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Checks one URL. All failures end up inside the returned result.
    pub async fn probe(&self, url: &str) -> ValidationResult {
        let mut state = RetryState::Attempting(1);

        loop {
            state = match state {
                RetryState::Attempting(attempt) => {
                    let delay = self.policy.backoff(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let outcome = self.transport.attempt(url).await;
                    self.policy.advance(url, attempt, outcome)
                }
                RetryState::Succeeded(result) | RetryState::Exhausted(result) => return result,
            };
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why does a 404 count as reachable?
//    - The server received the request and answered it
//    - The link is "broken" in the content sense, but the host is up
//    - Callers can still tell the two apart by looking at `status`
//
// 2. Why retry 5xx but not 4xx?
//    - 502/503 are often a server restarting or a proxy hiccup
//    - A 404 will still be a 404 a second later
//
// 3. Why a state machine instead of a plain for loop?
//    - advance() is a pure function of (attempt, outcome)
//    - Tests can check every transition without sleeping or networking
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    // Replays a fixed list of outcomes, then repeats the last one
    struct ScriptedTransport {
        outcomes: Mutex<VecDeque<Result<u16, TransportFailure>>>,
        last: Result<u16, TransportFailure>,
        calls: AtomicU32,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<u16, TransportFailure>>) -> Self {
            let last = script.last().cloned().unwrap();
            Self {
                outcomes: Mutex::new(script.into()),
                last,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Transport for &ScriptedTransport {
        async fn attempt(&self, _url: &str) -> Result<u16, TransportFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.outcomes.lock().unwrap().pop_front();
            next.unwrap_or_else(|| self.last.clone())
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = policy();
        assert_eq!(policy.backoff(1), Duration::ZERO);
        assert_eq!(policy.backoff(2), Duration::from_millis(100));
        assert_eq!(policy.backoff(3), Duration::from_millis(200));
        assert_eq!(policy.backoff(4), Duration::from_millis(400));
    }

    #[test]
    fn test_advance_transitions() {
        let policy = policy();
        let url = "https://example.com/";

        assert_eq!(
            policy.advance(url, 1, Ok(200)),
            RetryState::Succeeded(ValidationResult::responded(url, 200))
        );
        assert_eq!(
            policy.advance(url, 1, Ok(404)),
            RetryState::Succeeded(ValidationResult::responded(url, 404))
        );
        assert_eq!(policy.advance(url, 1, Ok(503)), RetryState::Attempting(2));
        assert_eq!(
            policy.advance(url, 2, Err(TransportFailure::Timeout)),
            RetryState::Attempting(3)
        );
        assert_eq!(
            policy.advance(url, 3, Err(TransportFailure::Timeout)),
            RetryState::Exhausted(ValidationResult::unavailable(url))
        );
        assert_eq!(
            policy.advance(url, 3, Ok(503)),
            RetryState::Exhausted(ValidationResult::responded(url, 503))
        );
        assert_eq!(
            policy.advance(url, 1, Err(TransportFailure::TooManyRedirects)),
            RetryState::Exhausted(ValidationResult::unavailable(url))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt() {
        let transport = ScriptedTransport::new(vec![
            Err(TransportFailure::Timeout),
            Err(TransportFailure::Connect("reset".to_string())),
            Ok(200),
        ]);
        let executor = ProbeExecutor::new(&transport, policy());

        let result = executor.probe("https://example.com/").await;

        assert_eq!(result, ValidationResult::responded("https://example.com/", 200));
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_exhausts_attempts() {
        let transport = ScriptedTransport::new(vec![Err(TransportFailure::Timeout)]);
        let executor = ProbeExecutor::new(&transport, policy());

        let started = tokio::time::Instant::now();
        let result = executor.probe("https://down.test/").await;

        assert_eq!(result.status, ProbeStatus::Unavailable);
        assert!(!result.reachable);
        assert_eq!(transport.calls(), 3);
        // 100ms before attempt 2, 200ms before attempt 3
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_is_not_retried() {
        let transport = ScriptedTransport::new(vec![Ok(404)]);
        let executor = ProbeExecutor::new(&transport, policy());

        let result = executor.probe("https://example.com/missing").await;

        assert_eq!(result.status, ProbeStatus::Code(404));
        assert!(result.reachable);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_server_error_keeps_code() {
        let transport = ScriptedTransport::new(vec![Ok(502)]);
        let executor = ProbeExecutor::new(&transport, policy());

        let result = executor.probe("https://example.com/").await;

        assert_eq!(result.status, ProbeStatus::Code(502));
        assert!(result.reachable);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_redirect_loop_is_not_retried() {
        let transport = ScriptedTransport::new(vec![Err(TransportFailure::TooManyRedirects)]);
        let executor = ProbeExecutor::new(&transport, policy());

        let result = executor.probe("https://loop.test/").await;

        assert!(!result.reachable);
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn test_status_serialization() {
        let ok = serde_json::to_value(ValidationResult::responded("https://a.test/", 200)).unwrap();
        assert_eq!(ok["status"], 200);
        assert_eq!(ok["reachable"], true);

        let down = serde_json::to_value(ValidationResult::unavailable("https://a.test/")).unwrap();
        assert_eq!(down["status"], "N/A");
        assert_eq!(down["reachable"], false);
    }

    #[tokio::test]
    async fn test_http_transport_against_mock_server() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(410))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = ValidatorConfig {
            retry_base_delay: Duration::from_millis(1),
            ..ValidatorConfig::default()
        };
        let executor = ProbeExecutor::new(
            HttpTransport::new(&config).unwrap(),
            RetryPolicy::from_config(&config),
        );

        let ok = executor.probe(&format!("{}/ok", mock_server.uri())).await;
        assert_eq!(ok.status, ProbeStatus::Code(200));
        assert!(ok.reachable);

        let gone = executor.probe(&format!("{}/gone", mock_server.uri())).await;
        assert_eq!(gone.status, ProbeStatus::Code(410));
        assert!(gone.reachable);
    }

    #[tokio::test]
    async fn test_http_transport_redirect_limit() {
        let mock_server = MockServer::start().await;

        // /loop redirects to itself forever
        Mock::given(method("GET"))
            .and(path("/loop"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", format!("{}/loop", mock_server.uri()).as_str()),
            )
            .mount(&mock_server)
            .await;

        let config = ValidatorConfig::default();
        let transport = HttpTransport::new(&config).unwrap();

        let outcome = transport.attempt(&format!("{}/loop", mock_server.uri())).await;
        assert_eq!(outcome, Err(TransportFailure::TooManyRedirects));
    }

    #[tokio::test]
    async fn test_http_transport_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&mock_server)
            .await;

        let config = ValidatorConfig {
            probe_timeout: Duration::from_millis(50),
            ..ValidatorConfig::default()
        };
        let transport = HttpTransport::new(&config).unwrap();

        let outcome = transport.attempt(&format!("{}/slow", mock_server.uri())).await;
        assert_eq!(outcome, Err(TransportFailure::Timeout));
    }
}
