//! CLI for the ostress object-store read stressor.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ostress_core::logging::LogHandle;
use std::path::PathBuf;

use commands::{run_check, run_fetch, run_stress};

/// Top-level CLI. With no subcommand, behaves like `ostress run`.
#[derive(Debug, Parser)]
#[command(name = "ostress")]
#[command(about = "Randomized read load against an HTTP object store", long_about = None)]
pub struct Cli {
    /// TOML config file. Environment variables override its values.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download random manifest entries until a fatal error (or N iterations).
    Run {
        /// Stop after N iterations per worker instead of running forever.
        #[arg(long, value_name = "N")]
        iterations: Option<u64>,
        /// Number of independent loops to run side by side.
        #[arg(long, default_value = "1", value_name = "N")]
        workers: usize,
    },

    /// Validate configuration and manifest without touching the network.
    Check,

    /// Run a single transfer-and-validate against a URL and print the outcome.
    Fetch {
        /// Direct HTTP/HTTPS URL.
        url: String,
        /// Destination file (default: last URL path segment in the current directory).
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Extra request header, `Name: value`. Repeatable.
        #[arg(long = "header", short = 'H', value_name = "HEADER")]
        headers: Vec<String>,
        /// Fail validation unless the file has exactly this many bytes.
        #[arg(long, value_name = "BYTES")]
        expected_size: Option<u64>,
    },
}

impl CliCommand {
    pub fn run_from_args(log: &LogHandle) -> Result<()> {
        let cli = Cli::parse();
        let config = cli.config.as_deref();

        match cli.command {
            None => run_stress(config, None, 1, log)?,
            Some(CliCommand::Run {
                iterations,
                workers,
            }) => run_stress(config, iterations, workers, log)?,
            Some(CliCommand::Check) => run_check(config)?,
            Some(CliCommand::Fetch {
                url,
                output,
                headers,
                expected_size,
            }) => run_fetch(&url, output, &headers, expected_size)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
