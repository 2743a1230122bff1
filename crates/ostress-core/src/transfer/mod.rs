//! Transfer-and-validate: one HTTP GET to a local file, checked against size metadata.
//!
//! The body is streamed to `<destination>.part` and renamed onto the destination
//! only after a 2xx status, so a failed or non-2xx transfer never leaves a
//! destination file behind. Every failure category is reported as a
//! [`TransferOutcome`] variant; nothing escapes as an error.

mod headers;
mod outcome;
mod validate;

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::retry::{run_with_retry, AttemptError, RetryPolicy};

pub use headers::ResponseHeaders;
pub use outcome::{TransferOutcome, TransferReport, TransferStatus};
pub use validate::{check_sizes, SizeMismatch};

/// Suffix of the in-progress file next to the destination.
pub const PART_SUFFIX: &str = ".part";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub url: String,
    pub destination: PathBuf,
    /// Extra request headers (`name -> value`).
    pub headers: HashMap<String, String>,
}

impl TransferRequest {
    pub fn new(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            destination: destination.into(),
            headers: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    /// Bound on the whole request, body included.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Retries of connection-level failures after the first attempt.
    pub transport_retries: u32,
    /// Size every downloaded file must have; `None` skips that comparison.
    pub expected_size: Option<u64>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(30),
            transport_retries: 3,
            expected_size: None,
        }
    }
}

/// Status code and final headers of a completed GET.
struct Response {
    code: u32,
    headers: ResponseHeaders,
}

/// Download `request.url` to `request.destination` and validate the result.
pub fn transfer(request: &TransferRequest, options: &TransferOptions) -> TransferOutcome {
    tracing::info!("{}", request.url);
    let started = Instant::now();
    let part = part_path(&request.destination);

    let policy = RetryPolicy::transport(options.transport_retries);
    let response = match run_with_retry(&policy, || fetch_to(request, options, &part)) {
        Ok(response) => response,
        Err(e) => {
            discard(&part);
            tracing::error!("HTTP - Transfer of [{}] - FAILED: {}", request.url, e);
            return match e {
                AttemptError::Curl(ce) => TransferOutcome::Transport(ce.to_string()),
                AttemptError::Io(ioe) => TransferOutcome::Storage(ioe.to_string()),
            };
        }
    };

    if !(200..300).contains(&response.code) {
        discard(&part);
        tracing::error!(
            "HTTP - Transfer of [{}] - FAILED: {}",
            request.url,
            response
                .headers
                .status_line
                .clone()
                .unwrap_or_else(|| format!("HTTP {}", response.code))
        );
        return if response.code == 404 {
            TransferOutcome::NotFound
        } else {
            TransferOutcome::HttpStatus(response.code)
        };
    }

    if let Err(e) = fs::rename(&part, &request.destination) {
        discard(&part);
        tracing::error!(
            "HTTP - Transfer of [{}] - FAILED: rename to {}: {}",
            request.url,
            request.destination.display(),
            e
        );
        return TransferOutcome::Storage(e.to_string());
    }
    tracing::info!("HTTP - Transfer Complete");

    let file_size = match fs::metadata(&request.destination) {
        Ok(meta) => meta.len(),
        Err(e) => {
            tracing::error!("stat {}: {}", request.destination.display(), e);
            return TransferOutcome::Storage(e.to_string());
        }
    };
    let set_cookie = response.headers.set_cookie_joined();
    tracing::info!(
        "Set-Cookie = [{}], content_size = {}, file_size = {}, expected_size = {}",
        set_cookie.as_deref().unwrap_or("<none>"),
        display_opt(response.headers.content_length),
        file_size,
        display_opt(options.expected_size),
    );

    match check_sizes(response.headers.content_length, file_size, options.expected_size) {
        Ok(()) => TransferOutcome::Ok(TransferReport {
            content_length: file_size,
            file_size,
            expected_size: options.expected_size,
            set_cookie,
            elapsed: started.elapsed(),
        }),
        Err(mismatch) => {
            tracing::error!("size validation failed for [{}]: {}", request.url, mismatch);
            TransferOutcome::Invalid(mismatch)
        }
    }
}

/// `<destination>.part`
pub fn part_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

/// One GET attempt, streaming the body into `part` (truncated first).
/// The file handle is closed when this returns, on every path.
fn fetch_to(
    request: &TransferRequest,
    options: &TransferOptions,
    part: &Path,
) -> Result<Response, AttemptError> {
    let mut file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(part)?;
    let mut header_lines: Vec<String> = Vec::new();
    let mut write_error: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(&request.url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(options.connect_timeout)?;
    easy.timeout(options.timeout)?;

    if !request.headers.is_empty() {
        let mut list = curl::easy::List::new();
        for (name, value) in &request.headers {
            list.append(&format!("{}: {}", name.trim(), value.trim()))?;
        }
        easy.http_headers(list)?;
    }

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            header_lines.push(header_line(data));
            true
        })?;
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                write_error = Some(e);
                // Short count makes libcurl abort the transfer.
                Ok(0)
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = write_error {
        return Err(AttemptError::Io(e));
    }
    if let Err(e) = performed {
        // A 2xx body cut short of its Content-Length is still a written file;
        // size validation reports the shortfall.
        let code = easy.response_code().unwrap_or(0);
        if !(e.is_partial_file() && (200..300).contains(&code)) {
            return Err(e.into());
        }
        tracing::warn!("[{}] ended early: {}", request.url, e);
    }
    file.flush()?;

    let code = easy.response_code()?;
    Ok(Response {
        code,
        headers: ResponseHeaders::parse(&header_lines),
    })
}

fn discard(part: &Path) {
    if let Err(e) = fs::remove_file(part) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("could not remove {}: {}", part.display(), e);
        }
    }
}

/// Header bytes as text; invalid UTF-8 is replaced rather than dropped.
fn header_line(data: &[u8]) -> String {
    String::from_utf8_lossy(data).trim_end().to_string()
}

fn display_opt(value: Option<u64>) -> String {
    value.map_or_else(|| "<none>".to_string(), |v| v.to_string())
}
