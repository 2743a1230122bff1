//! Independent stress loops on OS threads.
//!
//! Workers share only the immutable config and manifest. Each has its own RNG
//! and, when more than one runs, its own `worker-<i>` download directory so
//! that two workers picking the same entry never touch the same file.

use std::fs;
use std::sync::{mpsc, Arc};
use std::thread;

use super::{Picker, RunLimits, RunSummary, StressError, StressLoop};
use crate::config::StressConfig;
use crate::logging::LogHandle;
use crate::manifest::Manifest;

/// Run `workers` loops and wait for them. Returns the first fatal error from any
/// worker as soon as it arrives; with bounded limits, returns the merged summary
/// once every worker has finished.
pub fn run_workers(
    config: &StressConfig,
    manifest: Arc<Manifest>,
    workers: usize,
    limits: RunLimits,
    log: &LogHandle,
) -> Result<RunSummary, StressError> {
    if workers <= 1 {
        let picker = Picker::from_os_rng(config);
        return StressLoop::new(config, &manifest, picker).run(limits);
    }

    let (tx, rx) = mpsc::channel::<(usize, Result<RunSummary, StressError>)>();
    let mut handles = Vec::with_capacity(workers);
    for index in 0..workers {
        let work_dir = config.work_dir.join(format!("worker-{}", index));
        fs::create_dir_all(&work_dir).map_err(|source| StressError::WorkDir {
            path: work_dir.clone(),
            source,
        })?;

        let config = config.clone();
        let manifest = Arc::clone(&manifest);
        let log = log.clone();
        let tx = tx.clone();
        let handle = thread::Builder::new()
            .name(format!("worker-{}", index))
            .spawn(move || {
                let _log = log.enter();
                tracing::info!("worker {} started in {}", index, work_dir.display());
                let picker = Picker::from_os_rng(&config);
                let result = StressLoop::new(&config, &manifest, picker)
                    .with_work_dir(work_dir)
                    .run(limits);
                let _ = tx.send((index, result));
            })
            .map_err(|source| StressError::Spawn { index, source })?;
        handles.push(handle);
    }
    drop(tx);

    let mut summary = RunSummary::default();
    let mut finished = 0;
    while finished < workers {
        match rx.recv() {
            Ok((index, Ok(worker_summary))) => {
                tracing::info!(
                    "worker {} finished: {} iterations, {} ok, {} not found",
                    index,
                    worker_summary.iterations,
                    worker_summary.ok,
                    worker_summary.not_found
                );
                summary.merge(worker_summary);
                finished += 1;
            }
            Ok((index, Err(e))) => {
                tracing::error!("worker {} stopped: {}", index, e);
                return Err(e);
            }
            // Every sender is gone but some worker never reported: it panicked.
            Err(_) => break,
        }
    }

    for (index, handle) in handles.into_iter().enumerate() {
        if handle.join().is_err() {
            return Err(StressError::WorkerPanicked(index));
        }
    }
    Ok(summary)
}
