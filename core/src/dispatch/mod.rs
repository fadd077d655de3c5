//! dispatch: bounded-parallelism compression of every catalog entry.
//!
//! Responsibilities:
//! - Run one compression task per entry, at most `pool_capacity` at a time
//! - Give each task exclusive ownership of its entry's result slot
//! - Apply the halt/skip error policy
//!
//! Non-responsibilities:
//! - Discovery and ordering (catalog)
//! - Archive layout (archive)

pub mod parallelism;
pub mod pool;
pub mod types;
pub mod worker;

pub use parallelism::{ErrorPolicy, ParallelismProfile, SchedulePolicy};
pub use pool::Dispatcher;
pub use types::{CompressTask, DispatchReport, SkippedEntry, TaskConfig, TaskResult, WorkerStats};
pub use worker::{run_compression_worker, CompressionWorker};
