//! `ostress fetch`: one transfer-and-validate call.

use anyhow::{bail, Result};
use ostress_core::transfer::{self, TransferOptions, TransferRequest};
use ostress_core::url_model;
use std::path::PathBuf;

const DEFAULT_OUTPUT: &str = "download.bin";

pub fn run_fetch(
    url: &str,
    output: Option<PathBuf>,
    headers: &[String],
    expected_size: Option<u64>,
) -> Result<()> {
    let destination = output.unwrap_or_else(|| {
        PathBuf::from(url_model::filename_from_url(url).unwrap_or_else(|| DEFAULT_OUTPUT.to_string()))
    });
    let mut request = TransferRequest::new(url, destination);
    for raw in headers {
        let (name, value) = parse_header(raw)?;
        request = request.with_header(name, value);
    }
    let options = TransferOptions {
        expected_size,
        ..TransferOptions::default()
    };

    let outcome = transfer::transfer(&request, &options);
    println!("{}  {}", outcome, request.destination.display());
    if !outcome.is_ok() {
        bail!("transfer of {} failed (status {})", url, outcome.status().code());
    }
    Ok(())
}

/// `"Name: value"` -> `("Name", "value")`.
pub(crate) fn parse_header(raw: &str) -> Result<(String, String)> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => bail!("invalid header {:?}, expected `Name: value`", raw),
    }
}
