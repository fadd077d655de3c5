use crate::compression::{CodecOptions, CompressedBlob, TruncationPolicy};
use crate::constants::BUFFER_CAP;
use crate::telemetry::{StageTimes, TelemetryCounters};
use crate::types::{Result, VzipError};

/// Per-task settings, copied into every worker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TaskConfig {
    pub codec: CodecOptions,
    pub buffer_cap: usize,
    pub truncation: TruncationPolicy,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            codec: CodecOptions::default(),
            buffer_cap: BUFFER_CAP,
            truncation: TruncationPolicy::default(),
        }
    }
}

impl TaskConfig {
    pub fn validate(&self) -> Result<()> {
        if self.buffer_cap == 0 {
            return Err(VzipError::Invocation("buffer capacity must be at least 1 byte".into()));
        }
        self.codec.validate().map_err(|e| VzipError::Invocation(e.to_string()))
    }
}

/// One unit of work sent down the queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressTask {
    pub index: usize,
    pub path: String,
}

#[derive(Debug)]
pub struct TaskResult {
    pub index: usize,
    pub result: Result<CompressedBlob>,
}

/// What a worker accumulated over its lifetime.
#[derive(Clone, Debug, Default)]
pub struct WorkerStats {
    pub tasks: usize,
    pub counters: TelemetryCounters,
    pub stage_times: StageTimes,
}

impl WorkerStats {
    pub fn merge(&mut self, other: &WorkerStats) {
        self.tasks += other.tasks;
        self.counters.merge(&other.counters);
        self.stage_times.merge(&other.stage_times);
    }
}

#[derive(Debug)]
pub struct SkippedEntry {
    pub index: usize,
    pub path: String,
    pub error: VzipError,
}

/// Outcome of dispatching a whole catalog.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Task count per wave (waves schedule only).
    pub waves: Vec<usize>,
    /// Threads started; per wave in waves mode this is the largest wave.
    pub workers: usize,
    pub completed: usize,
    pub skipped: Vec<SkippedEntry>,
    pub stats: WorkerStats,
}

impl DispatchReport {
    pub fn skipped_paths(&self) -> impl Iterator<Item = &str> {
        self.skipped.iter().map(|s| s.path.as_str())
    }
}

