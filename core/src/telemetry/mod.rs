//! telemetry/mod.rs
//! Counters, stage timers and immutable run snapshots.
//!
//! Notes:
//! - Compression ratio is `bytes_out / bytes_in`.
//! - Throughput is `bytes_in / elapsed`.
//! - Snapshots are plain data and serialize with serde for `--stats-json`.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
