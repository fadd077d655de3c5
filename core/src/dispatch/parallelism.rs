use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_POOL_CAPACITY, DEFAULT_MEM_FRACTION};
use crate::types::{Result, VzipError};

/// How tasks are fed to the pool.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SchedulePolicy {
    /// Launch up to `pool_capacity` tasks, join them all, then launch the
    /// next batch. Idle slots wait for the slowest task of the wave.
    Waves,
    /// Fixed set of workers draining a bounded channel of tasks; a worker
    /// picks up the next file as soon as it finishes the previous one.
    #[default]
    Queue,
}

impl fmt::Display for SchedulePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulePolicy::Waves => f.write_str("waves"),
            SchedulePolicy::Queue => f.write_str("queue"),
        }
    }
}

impl FromStr for SchedulePolicy {
    type Err = VzipError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "waves" | "wave" => Ok(SchedulePolicy::Waves),
            "queue" => Ok(SchedulePolicy::Queue),
            other => Err(VzipError::Invocation(format!("unknown schedule '{other}'"))),
        }
    }
}

/// Reaction to a failed frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop dispatching and fail the run with the first error.
    #[default]
    Halt,
    /// Drop the frame from the archive, report it, keep going.
    Skip,
}

/// Parallelism configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelismProfile {
    pub pool_capacity: usize,
    pub schedule: SchedulePolicy,
}

impl Default for ParallelismProfile {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY, SchedulePolicy::default())
    }
}

impl ParallelismProfile {
    pub fn new(pool_capacity: usize, schedule: SchedulePolicy) -> Self {
        Self { pool_capacity, schedule }
    }

    pub fn single_threaded() -> Self {
        Self::new(1, SchedulePolicy::Queue)
    }

    /// Size the pool from CPU count and available memory.
    ///
    /// Every in-flight task holds an input and an output buffer of
    /// `buffer_cap` bytes, so the memory budget bounds the pool too.
    pub fn dynamic(buffer_cap: usize, mem_fraction: f64, hard_cap: usize) -> Self {
        let cores = num_cpus::get().max(1);

        let mut sys = sysinfo::System::new();
        sys.refresh_memory();
        let budget = (sys.available_memory() as f64 * mem_fraction) as u64;
        let per_task = (2 * buffer_cap.max(1)) as u64;
        let by_memory = (budget / per_task).max(1) as usize;

        let pool_capacity = cores.min(by_memory).min(hard_cap.max(1));
        tracing::debug!(cores, by_memory, pool_capacity, "dynamic parallelism profile");

        Self::new(pool_capacity, SchedulePolicy::Queue)
    }

    pub fn dynamic_default(buffer_cap: usize) -> Self {
        Self::dynamic(buffer_cap, DEFAULT_MEM_FRACTION, DEFAULT_POOL_CAPACITY)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pool_capacity == 0 {
            return Err(VzipError::Invocation("pool capacity must be at least 1".into()));
        }
        Ok(())
    }

    /// Threads actually started for `tasks` pending tasks.
    pub fn workers_for(&self, tasks: usize) -> usize {
        self.pool_capacity.min(tasks)
    }

    /// Sizes of the waves `tasks` tasks split into; the last may be short.
    pub fn wave_sizes(&self, tasks: usize) -> Vec<usize> {
        if self.pool_capacity == 0 {
            return Vec::new();
        }
        (0..tasks)
            .step_by(self.pool_capacity)
            .map(|start| self.pool_capacity.min(tasks - start))
            .collect()
    }
}
