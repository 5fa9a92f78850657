use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry policy for model calls: linear backoff, fixed attempt budget.
///
/// After a failed attempt N (1-based) the caller sleeps `backoff * N`
/// before retrying. Once `retries` extra attempts are exhausted the last
/// error is propagated.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Number of retries after the first attempt
    pub retries: usize,
    /// Base backoff duration, multiplied by the attempt number
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            backoff: Duration::from_millis(800),
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: usize, backoff: Duration) -> Self {
        Self { retries, backoff }
    }
}

/// Run an async operation under the given retry policy
pub async fn run_with_retry<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0usize;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt >= policy.retries {
                    return Err(e);
                }
                attempt += 1;
                let wait = policy.backoff.mul_f64(attempt as f64);
                warn!(
                    attempt,
                    wait_secs = wait.as_secs_f64(),
                    error = %e,
                    "Model call failed, retrying"
                );
                tokio::time::sleep(wait).await;
            }
        }
    }
}
