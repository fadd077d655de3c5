//! vzip-core
//!
//! Compresses every frame file of a directory independently with deflate and
//! concatenates the results into one length-prefixed archive.
//! No async runtime, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

pub mod archive;
pub mod catalog;
pub mod compression;
pub mod dispatch;
pub mod telemetry;

pub mod pipeline;

pub use pipeline::{run_pipeline, PipelineConfig, PipelineOutcome};
pub use types::{Result, VzipError};

// -----------------------------------------------------------------------------
// Prelude
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::catalog::{scan_dir, Catalog, CatalogEntry};
    pub use crate::compression::{StreamFormat, TruncationPolicy};
    pub use crate::dispatch::{Dispatcher, ErrorPolicy, ParallelismProfile, SchedulePolicy};
    pub use crate::pipeline::{run_pipeline, PipelineConfig, PipelineOutcome};
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{Result, VzipError};
}
