//! Transport-level retry for a single transfer.
//!
//! Only connection-level failures (refused, DNS, reset, send/recv errors) are
//! retried. Timeouts, HTTP statuses and local I/O errors surface on the first
//! attempt. Retries happen beneath the transfer boundary and are invisible to
//! the caller except in the log.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error};
pub use error::AttemptError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
