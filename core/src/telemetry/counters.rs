//! telemetry/counters.rs
//! Mutable counters collected during a run.
//!
//! Converted into an immutable `TelemetrySnapshot` at the end.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub files_found: u64,
    pub files_compressed: u64,
    pub files_truncated: u64,
    pub files_skipped: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    /// Length-prefix bytes plus payload bytes actually written.
    pub archive_bytes: u64,
}

impl TelemetryCounters {
    /// Record one compressed frame.
    ///
    /// - `input_len`: bytes fed to the compressor
    /// - `output_len`: compressed payload length
    pub fn add_compressed(&mut self, input_len: usize, output_len: usize, truncated: bool) {
        self.files_compressed += 1;
        self.bytes_in += input_len as u64;
        self.bytes_out += output_len as u64;
        if truncated {
            self.files_truncated += 1;
        }
    }

    pub fn add_skipped(&mut self) {
        self.files_skipped += 1;
    }

    // Workers keep their own counters; merged once after join.
    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.files_found += other.files_found;
        self.files_compressed += other.files_compressed;
        self.files_truncated += other.files_truncated;
        self.files_skipped += other.files_skipped;
        self.bytes_in += other.bytes_in;
        self.bytes_out += other.bytes_out;
        self.archive_bytes += other.archive_bytes;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
