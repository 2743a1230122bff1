use std::time::Duration;

/// Classification of an attempt failure for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out. Not retried: the timeout already bounds the attempt.
    Timeout,
    /// Network-level failure (refused, DNS, reset).
    Connection,
    /// Anything else (protocol errors, short bodies, local I/O).
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Fixed-count retry of connection failures with a short capped backoff.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay before the first retry; doubles per retry.
    pub base_delay: Duration,
    /// Upper bound on a single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::transport(3)
    }
}

impl RetryPolicy {
    /// Policy allowing `retries` retries after the first attempt.
    pub fn transport(retries: u32) -> Self {
        Self {
            max_attempts: retries.saturating_add(1),
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
        }
    }

    /// `attempt` is 1-based (1 = first attempt).
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        match kind {
            ErrorKind::Timeout | ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::Connection => {
                let exp = 1u32 << attempt.saturating_sub(1).min(8);
                RetryDecision::RetryAfter(self.base_delay.saturating_mul(exp).min(self.max_delay))
            }
        }
    }
}
