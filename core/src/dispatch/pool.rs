use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam::channel::bounded;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::compression::{default_factory, CompressorFactory};
use crate::dispatch::parallelism::{ErrorPolicy, ParallelismProfile, SchedulePolicy};
use crate::dispatch::types::{CompressTask, DispatchReport, SkippedEntry, TaskConfig, TaskResult, WorkerStats};
use crate::dispatch::worker::{run_compression_worker, CompressionWorker};
use crate::types::{Result, VzipError};

/// Drives compression of every catalog entry under a parallelism profile.
#[derive(Clone)]
pub struct Dispatcher {
    pub profile: ParallelismProfile,
    pub task: TaskConfig,
    pub on_error: ErrorPolicy,
    factory: CompressorFactory,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("profile", &self.profile)
            .field("task", &self.task)
            .field("on_error", &self.on_error)
            .finish_non_exhaustive()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(ParallelismProfile::default(), TaskConfig::default(), ErrorPolicy::default())
    }
}

impl Dispatcher {
    pub fn new(profile: ParallelismProfile, task: TaskConfig, on_error: ErrorPolicy) -> Self {
        Self::with_factory(profile, task, on_error, default_factory())
    }

    /// Every worker gets its codec from `factory` instead of the deflate default.
    pub fn with_factory(
        profile: ParallelismProfile,
        task: TaskConfig,
        on_error: ErrorPolicy,
        factory: CompressorFactory,
    ) -> Self {
        Self {
            profile,
            task,
            on_error,
            factory,
        }
    }

    fn build_worker(&self) -> Result<CompressionWorker> {
        let compressor = (self.factory)(self.task.codec).map_err(|e| VzipError::Invocation(e.to_string()))?;
        CompressionWorker::with_compressor(self.task, compressor)
    }

    /// Compress every entry. On return every entry is filled, except the
    /// ones listed in `report.skipped` under `ErrorPolicy::Skip`.
    pub fn run(&self, catalog: &mut Catalog) -> Result<DispatchReport> {
        self.profile.validate()?;
        self.task.validate()?;

        if catalog.is_empty() {
            debug!("empty catalog, nothing to dispatch");
            return Ok(DispatchReport::default());
        }

        info!(
            files = catalog.len(),
            pool = self.profile.pool_capacity,
            schedule = %self.profile.schedule,
            "dispatching compression"
        );

        let report = match self.profile.schedule {
            SchedulePolicy::Waves => self.run_waves(catalog)?,
            SchedulePolicy::Queue => self.run_queue(catalog)?,
        };

        info!(completed = report.completed, skipped = report.skipped.len(), "dispatch finished");
        Ok(report)
    }

    /// Record a failed entry, or fail the run under `Halt`.
    fn on_failure(&self, report: &mut DispatchReport, index: usize, path: &str, error: VzipError) -> Result<()> {
        match self.on_error {
            ErrorPolicy::Halt => Err(error),
            ErrorPolicy::Skip => {
                warn!(path, stage = error.stage(), error = %error, "skipping frame");
                report.stats.counters.add_skipped();
                report.skipped.push(SkippedEntry {
                    index,
                    path: path.to_string(),
                    error,
                });
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------
    // Waves: batch of scoped threads, full join between batches
    // ------------------------------------------------------------
    fn run_waves(&self, catalog: &mut Catalog) -> Result<DispatchReport> {
        let capacity = self.profile.pool_capacity;
        let mut report = DispatchReport::default();

        for (wave_no, wave) in catalog.slots_mut().chunks_mut(capacity).enumerate() {
            let base = wave_no * capacity;
            debug!(wave = wave_no, size = wave.len(), "launching wave");
            let workers = (0..wave.len()).map(|_| self.build_worker()).collect::<Result<Vec<_>>>()?;

            // Each thread gets exclusive `&mut` access to exactly one slot.
            let outcomes: Vec<thread::Result<Result<WorkerStats>>> = thread::scope(|scope| {
                let handles: Vec<_> = wave
                    .iter_mut()
                    .zip(workers)
                    .map(|(slot, mut worker)| {
                        scope.spawn(move || -> Result<WorkerStats> {
                            let blob = worker.compress_file(&slot.path)?;
                            slot.fill(blob)?;
                            Ok(worker.into_stats())
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join()).collect()
            });

            report.waves.push(wave.len());
            report.workers = report.workers.max(wave.len());

            for (offset, outcome) in outcomes.into_iter().enumerate() {
                match outcome {
                    Err(_) => return Err(VzipError::Pipeline("compression task panicked")),
                    Ok(Ok(stats)) => {
                        report.completed += 1;
                        report.stats.merge(&stats);
                    }
                    Ok(Err(e)) => self.on_failure(&mut report, base + offset, &wave[offset].path, e)?,
                }
            }
        }

        Ok(report)
    }

    // ------------------------------------------------------------
    // Queue: fixed workers draining a bounded channel of tasks
    // ------------------------------------------------------------
    fn run_queue(&self, catalog: &mut Catalog) -> Result<DispatchReport> {
        let workers = self.profile.workers_for(catalog.len());
        let tasks: Vec<CompressTask> = catalog
            .paths()
            .enumerate()
            .map(|(index, path)| CompressTask {
                index,
                path: path.to_string(),
            })
            .collect();

        // Allocate every worker's buffers before any thread starts.
        let pool = (0..workers)
            .map(|_| self.build_worker())
            .collect::<Result<Vec<_>>>()?;

        let (task_tx, task_rx) = bounded::<CompressTask>(workers);
        let (out_tx, out_rx) = bounded::<TaskResult>(workers);
        let cancel = AtomicBool::new(false);

        let mut report = DispatchReport {
            workers,
            ..DispatchReport::default()
        };
        let mut first_error: Option<VzipError> = None;

        thread::scope(|scope| {
            let cancel = &cancel;

            // ---- Feeder ----
            scope.spawn(move || {
                for task in tasks {
                    if cancel.load(Ordering::Acquire) || task_tx.send(task).is_err() {
                        break;
                    }
                }
                // task_tx dropped here: workers drain and exit
            });

            // ---- Workers ----
            let handles: Vec<_> = pool
                .into_iter()
                .enumerate()
                .map(|(id, worker)| {
                    let rx = task_rx.clone();
                    let tx = out_tx.clone();
                    scope.spawn(move || run_compression_worker(id, worker, rx, tx, cancel))
                })
                .collect();
            drop(task_rx);
            drop(out_tx);

            // ---- Collector: sole writer of catalog slots ----
            for TaskResult { index, result } in out_rx.iter() {
                if first_error.is_some() {
                    continue;
                }
                let outcome = match result {
                    Ok(blob) => catalog.fill(index, blob).map(|_| report.completed += 1),
                    Err(e) => {
                        let path = catalog.get(index).map(|entry| entry.path.clone()).unwrap_or_default();
                        self.on_failure(&mut report, index, &path, e)
                    }
                };
                if let Err(e) = outcome {
                    cancel.store(true, Ordering::Release);
                    first_error = Some(e);
                }
            }

            for handle in handles {
                match handle.join() {
                    Ok(stats) => report.stats.merge(&stats),
                    Err(_) => {
                        first_error.get_or_insert(VzipError::Pipeline("compression worker panicked"));
                    }
                }
            }
        });

        match first_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }
}
