//! telemetry/snapshot.rs
//! Immutable summary of one pipeline run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub files_found: u64,
    pub files_compressed: u64,
    pub files_truncated: u64,
    pub files_skipped: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub archive_bytes: u64,
    /// Threads started by the dispatcher.
    pub workers: usize,
    /// Task count per wave; empty in queue mode.
    pub waves: Vec<usize>,
    pub compression_ratio: f64,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer, workers: usize, waves: Vec<usize>) -> Self {
        let elapsed = timer.elapsed();

        let compression_ratio = if counters.bytes_in > 0 {
            counters.bytes_out as f64 / counters.bytes_in as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_in as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            files_found: counters.files_found,
            files_compressed: counters.files_compressed,
            files_truncated: counters.files_truncated,
            files_skipped: counters.files_skipped,
            bytes_in: counters.bytes_in,
            bytes_out: counters.bytes_out,
            archive_bytes: counters.archive_bytes,
            workers,
            waves,
            compression_ratio,
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn stage_ms(&self, stage: Stage) -> f64 {
        self.stage_times.get_ms(stage)
    }

    /// Internal consistency: every found file is either compressed or skipped.
    pub fn sanity_check(&self) -> bool {
        self.files_compressed + self.files_skipped == self.files_found
            && self.files_truncated <= self.files_compressed
            && self.archive_bytes >= self.bytes_out
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self::from(&TelemetryCounters::default(), &TelemetryTimer::new(), 0, Vec::new())
    }
}

