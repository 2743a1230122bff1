//! What a transfer reports back to the loop.

use std::fmt;
use std::time::Duration;

use super::validate::SizeMismatch;

/// Coarse result code the driving loop acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    Ok,
    NotFound,
    ServiceUnavailable,
}

impl TransferStatus {
    /// Equivalent HTTP status code.
    pub fn code(self) -> u16 {
        match self {
            TransferStatus::Ok => 200,
            TransferStatus::NotFound => 404,
            TransferStatus::ServiceUnavailable => 503,
        }
    }
}

/// Figures from a validated download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    pub content_length: u64,
    pub file_size: u64,
    pub expected_size: Option<u64>,
    pub set_cookie: Option<String>,
    pub elapsed: Duration,
}

/// Detailed outcome of one transfer-and-validate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Downloaded and validated.
    Ok(TransferReport),
    /// HTTP 404. No destination file was written.
    NotFound,
    /// Any other non-2xx status. No destination file was written.
    HttpStatus(u32),
    /// Timeout or connection failure after transport retries.
    Transport(String),
    /// The response could not be persisted locally.
    Storage(String),
    /// Written to the destination but failed size validation. The file is left in place.
    Invalid(SizeMismatch),
}

impl TransferOutcome {
    pub fn status(&self) -> TransferStatus {
        match self {
            TransferOutcome::Ok(_) => TransferStatus::Ok,
            TransferOutcome::NotFound => TransferStatus::NotFound,
            TransferOutcome::HttpStatus(_)
            | TransferOutcome::Transport(_)
            | TransferOutcome::Storage(_)
            | TransferOutcome::Invalid(_) => TransferStatus::ServiceUnavailable,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, TransferOutcome::Ok(_))
    }

    /// True when a destination file exists as a result of this call.
    pub fn wrote_destination(&self) -> bool {
        matches!(self, TransferOutcome::Ok(_) | TransferOutcome::Invalid(_))
    }
}

impl fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferOutcome::Ok(r) => write!(f, "ok ({} bytes in {:.2?})", r.file_size, r.elapsed),
            TransferOutcome::NotFound => write!(f, "not found (HTTP 404)"),
            TransferOutcome::HttpStatus(code) => write!(f, "HTTP {}", code),
            TransferOutcome::Transport(msg) => write!(f, "transport error: {}", msg),
            TransferOutcome::Storage(msg) => write!(f, "storage error: {}", msg),
            TransferOutcome::Invalid(m) => write!(f, "size validation failed: {}", m),
        }
    }
}
