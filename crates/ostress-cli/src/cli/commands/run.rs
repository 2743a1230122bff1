//! `ostress run`: the stress loop.

use anyhow::{Context, Result};
use ostress_core::config;
use ostress_core::logging::LogHandle;
use ostress_core::stress::{self, RunLimits};
use std::path::Path;
use std::sync::Arc;

pub fn run_stress(
    config_path: Option<&Path>,
    iterations: Option<u64>,
    workers: usize,
    log: &LogHandle,
) -> Result<()> {
    let cfg = config::load(config_path).context("configuration")?;
    tracing::debug!("loaded config: {:?}", cfg);
    let manifest = stress::prepare(&cfg).context("startup")?;

    let limits = RunLimits { iterations };
    let summary = stress::run_workers(&cfg, Arc::new(manifest), workers.max(1), limits, log)
        .context("stress run stopped")?;

    tracing::info!(
        "run completed: {} iterations, {} ok, {} not found",
        summary.iterations,
        summary.ok,
        summary.not_found
    );
    Ok(())
}
