//! `ostress check`: validate config and manifest, print what a run would do.

use anyhow::{Context, Result};
use ostress_core::config;
use ostress_core::manifest::Manifest;
use std::path::Path;

pub fn run_check(config_path: Option<&Path>) -> Result<()> {
    let cfg = config::load(config_path).context("configuration")?;
    let manifest = Manifest::load(&cfg.manifest_path).context("manifest")?;
    manifest
        .check_range(&cfg.data_range())
        .context("data range")?;

    println!("object store:   {}/{}", cfg.object_store_url, cfg.fixture_collection);
    println!(
        "manifest:       {} ({} entries, using {}..={})",
        cfg.manifest_path.display(),
        manifest.len(),
        cfg.data_range_min,
        cfg.data_range_max
    );
    println!("sleep:          {}..={}s", cfg.sleep_range_min, cfg.sleep_range_max);
    println!("work dir:       {}", cfg.work_dir.display());
    match cfg.expected_file_size {
        Some(size) => println!("expected size:  {} bytes", size),
        None => println!("expected size:  not checked"),
    }
    println!(
        "transport:      timeout {}s, {} retries",
        cfg.transfer_timeout.as_secs(),
        cfg.transport_retries
    );
    Ok(())
}
