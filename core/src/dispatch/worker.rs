use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use bytes::Bytes;
use crossbeam::channel::{Receiver, Sender};
use tracing::{debug, warn};

use crate::compression::{
    create_compressor, read_capped, BoundedBuffer, CompressedBlob, Compressor, TruncationPolicy,
};
use crate::dispatch::types::{CompressTask, TaskConfig, TaskResult, WorkerStats};
use crate::telemetry::Stage;
use crate::types::{Result, VzipError};

/// Compressor plus its two reusable buffers.
pub struct CompressionWorker {
    compressor: Box<dyn Compressor>,
    input: BoundedBuffer,
    output: BoundedBuffer,
    config: TaskConfig,
    stats: WorkerStats,
}

impl CompressionWorker {
    pub fn new(config: TaskConfig) -> Result<Self> {
        config.validate()?;
        let compressor = create_compressor(config.codec).map_err(|e| VzipError::Invocation(e.to_string()))?;
        Self::with_compressor(config, compressor)
    }

    /// Same as `new`, with a caller-supplied codec.
    pub fn with_compressor(config: TaskConfig, compressor: Box<dyn Compressor>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            compressor,
            input: BoundedBuffer::with_capacity(config.buffer_cap),
            output: BoundedBuffer::with_capacity(config.buffer_cap),
            config,
            stats: WorkerStats::default(),
        })
    }

    /// Read at most `buffer_cap` bytes of `path` and deflate them in one pass.
    pub fn compress_file(&mut self, path: &str) -> Result<CompressedBlob> {
        self.stats.tasks += 1;

        let start = Instant::now();
        let outcome = read_capped(Path::new(path), &mut self.input).map_err(|source| VzipError::Read {
            path: path.to_string(),
            source,
        })?;
        self.stats.stage_times.add(Stage::Read, start.elapsed());

        if outcome.truncated {
            let cap = self.input.capacity();
            match self.config.truncation {
                TruncationPolicy::Reject => {
                    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(cap as u64 + 1);
                    return Err(VzipError::Oversize {
                        path: path.to_string(),
                        size,
                        cap,
                    });
                }
                TruncationPolicy::Truncate => {
                    warn!(path, cap, "frame larger than buffer, compressing first {cap} bytes only");
                }
            }
        }

        let start = Instant::now();
        let written = self
            .compressor
            .compress_into(self.input.as_slice(), &mut self.output)
            .map_err(|source| VzipError::Compress {
                path: path.to_string(),
                source,
            })?;
        self.stats.stage_times.add(Stage::Compress, start.elapsed());

        self.stats.counters.add_compressed(outcome.len, written, outcome.truncated);
        debug!(path, input = outcome.len, output = written, "frame compressed");

        Ok(CompressedBlob {
            bytes: Bytes::copy_from_slice(self.output.as_slice()),
            input_len: outcome.len,
            truncated: outcome.truncated,
        })
    }

    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    pub fn into_stats(self) -> WorkerStats {
        self.stats
    }
}

/// Single queue worker loop. Exits when the task channel closes, the result
/// channel closes, or `cancel` is raised.
pub fn run_compression_worker(
    id: usize,
    mut worker: CompressionWorker,
    rx: Receiver<CompressTask>,
    tx: Sender<TaskResult>,
    cancel: &AtomicBool,
) -> WorkerStats {
    debug!(worker = id, "compression worker started");

    while let Ok(task) = rx.recv() {
        if cancel.load(Ordering::Acquire) {
            debug!(worker = id, index = task.index, "cancelled, dropping task");
            break;
        }

        let result = worker.compress_file(&task.path);
        if tx.send(TaskResult { index: task.index, result }).is_err() {
            break;
        }
    }

    debug!(worker = id, tasks = worker.stats().tasks, "compression worker finished");
    worker.into_stats()
}
