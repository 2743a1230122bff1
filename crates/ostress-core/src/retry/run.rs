//! Retry loop: run an attempt until success or the policy says stop.

use super::classify::classify;
use super::error::AttemptError;
use super::policy::{RetryDecision, RetryPolicy};

pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut attempt_fn: F) -> Result<T, AttemptError>
where
    F: FnMut() -> Result<T, AttemptError>,
{
    let mut attempt = 1u32;
    loop {
        match attempt_fn() {
            Ok(value) => return Ok(value),
            Err(e) => match policy.decide(attempt, classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        "transport error on attempt {}/{}: {}; retrying in {:?}",
                        attempt,
                        policy.max_attempts,
                        e,
                        delay
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
            },
        }
    }
}
