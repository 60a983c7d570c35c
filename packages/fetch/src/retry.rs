//! Bounded retry with linear backoff.
//!
//! Unlike a typical transient-error policy, every failure is retried:
//! transport errors and *any* non-2xx status (4xx included). After the
//! `n`-th failed attempt the loop waits `n × backoff_step` before trying
//! again, so the default policy (3 attempts, 1s step) sleeps 1s then 2s
//! before giving up with [`FetchError::Exhausted`].

use std::time::Duration;

use crate::{FetchError, HttpResponse, HttpTransport};

/// Default number of attempts (first try included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default backoff unit. The wait after attempt `n` is `n × step`.
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(1000);

/// Environment variable overriding [`DEFAULT_MAX_ATTEMPTS`].
pub const RETRIES_ENV_VAR: &str = "GUARDIAN_FETCH_RETRIES";

/// How many times to try a request and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 behave as 1.
    pub max_attempts: u32,
    /// Linear backoff unit.
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_step: DEFAULT_BACKOFF_STEP,
        }
    }
}

impl RetryPolicy {
    /// Default policy with `max_attempts` taken from
    /// `GUARDIAN_FETCH_RETRIES` when it holds a positive integer.
    #[must_use]
    pub fn from_env() -> Self {
        let mut policy = Self::default();
        if let Some(attempts) = std::env::var(RETRIES_ENV_VAR)
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&n| n > 0)
        {
            policy.max_attempts = attempts;
        }
        policy
    }

    /// Delay before the attempt following failed attempt number
    /// `failed_attempt` (1-based).
    #[must_use]
    pub fn delay_after(&self, failed_attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(failed_attempt)
    }

    const fn attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }
}

/// Sends a GET to `url`, retrying every failure until `policy` is spent.
///
/// # Errors
///
/// Returns [`FetchError::Exhausted`] wrapping the last failure (a
/// [`FetchError::Status`] for non-2xx responses, or the transport error).
pub async fn fetch_with_retry(
    transport: &dyn HttpTransport,
    url: &str,
    policy: &RetryPolicy,
) -> Result<HttpResponse, FetchError> {
    let attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        let failure = match transport.get(url).await {
            Ok(response) if response.is_success() => return Ok(response),
            Ok(response) => FetchError::Status {
                url: url.to_string(),
                status: response.status,
            },
            Err(e) => e,
        };

        if attempt >= attempts {
            log::error!("Giving up on {url} after {attempt} attempt(s): {failure}");
            return Err(FetchError::Exhausted {
                url: url.to_string(),
                attempts: attempt,
                last: Box::new(failure),
            });
        }

        let delay = policy.delay_after(attempt);
        log::warn!("  attempt {attempt}/{attempts} failed ({failure}), retrying in {delay:?}...");
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedReply, ScriptedTransport};

    const URL: &str = "http://service.test/resource";

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt_after_two_server_errors() {
        let transport = ScriptedTransport::new().route(
            URL,
            vec![
                ScriptedReply::status(500),
                ScriptedReply::status(500),
                ScriptedReply::ok("third"),
            ],
        );
        let start = tokio::time::Instant::now();

        let response = fetch_with_retry(&transport, URL, &RetryPolicy::default())
            .await
            .unwrap();

        assert_eq!(response.body, "third");
        assert_eq!(transport.request_count(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_three_failures_with_linear_backoff() {
        let transport = ScriptedTransport::new().route(URL, vec![ScriptedReply::status(503)]);
        let start = tokio::time::Instant::now();

        let err = fetch_with_retry(&transport, URL, &RetryPolicy::default())
            .await
            .unwrap_err();

        assert_eq!(transport.request_count(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(1000 + 2000));
        match err {
            FetchError::Exhausted { attempts, last, .. } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, FetchError::Status { status: 503, .. }));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn client_errors_are_retried_too() {
        let transport = ScriptedTransport::new().route(
            URL,
            vec![ScriptedReply::status(404), ScriptedReply::ok("[]")],
        );

        let response = fetch_with_retry(&transport, URL, &RetryPolicy::default())
            .await
            .unwrap();

        assert_eq!(response.body, "[]");
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_errors_are_retried_and_reported() {
        let transport =
            ScriptedTransport::new().route(URL, vec![ScriptedReply::fail("connection reset")]);

        let err = fetch_with_retry(&transport, URL, &RetryPolicy::default())
            .await
            .unwrap_err();

        assert_eq!(transport.request_count(), 3);
        let FetchError::Exhausted { last, .. } = err else {
            panic!("expected Exhausted");
        };
        assert!(last.to_string().contains("connection reset"));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_tries_once() {
        let transport = ScriptedTransport::new().route(URL, vec![ScriptedReply::status(500)]);
        let policy = RetryPolicy {
            max_attempts: 0,
            backoff_step: DEFAULT_BACKOFF_STEP,
        };
        let start = tokio::time::Instant::now();

        assert!(fetch_with_retry(&transport, URL, &policy).await.is_err());
        assert_eq!(transport.request_count(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn delay_grows_linearly() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(5), Duration::from_secs(5));
    }
}
