// ## Pipeline wiring: catalog -> dispatch -> archive

use std::path::{Path, PathBuf};

use tracing::info;

use crate::archive::write_archive;
use crate::catalog::{scan_dir, Catalog};
use crate::compression::{CodecOptions, StreamFormat, TruncationPolicy};
use crate::constants::{BUFFER_CAP, DEFAULT_ARCHIVE_NAME, DEFAULT_COMPRESSION_LEVEL};
use crate::dispatch::{DispatchReport, Dispatcher, ErrorPolicy, ParallelismProfile, SchedulePolicy, TaskConfig};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::{Result, VzipError};

/// Everything one run needs. Defaults: 20 concurrent tasks over 1 MiB
/// buffers, level 9 zlib streams, truncate oversize frames, halt on error.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub input_dir: String,
    pub output: PathBuf,
    pub profile: ParallelismProfile,
    pub buffer_cap: usize,
    pub level: u32,
    pub format: StreamFormat,
    pub truncation: TruncationPolicy,
    pub on_error: ErrorPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: ".".into(),
            output: PathBuf::from(DEFAULT_ARCHIVE_NAME),
            profile: ParallelismProfile::default(),
            buffer_cap: BUFFER_CAP,
            level: DEFAULT_COMPRESSION_LEVEL,
            format: StreamFormat::default(),
            truncation: TruncationPolicy::default(),
            on_error: ErrorPolicy::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new(input_dir: impl Into<String>) -> Self {
        Self {
            input_dir: input_dir.into(),
            ..Self::default()
        }
    }

    pub fn output(mut self, output: impl AsRef<Path>) -> Self {
        self.output = output.as_ref().to_path_buf();
        self
    }

    pub fn pool_capacity(mut self, pool_capacity: usize) -> Self {
        self.profile.pool_capacity = pool_capacity;
        self
    }

    pub fn schedule(mut self, schedule: SchedulePolicy) -> Self {
        self.profile.schedule = schedule;
        self
    }

    pub fn buffer_cap(mut self, buffer_cap: usize) -> Self {
        self.buffer_cap = buffer_cap;
        self
    }

    pub fn level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn format(mut self, format: StreamFormat) -> Self {
        self.format = format;
        self
    }

    pub fn truncation(mut self, truncation: TruncationPolicy) -> Self {
        self.truncation = truncation;
        self
    }

    pub fn on_error(mut self, on_error: ErrorPolicy) -> Self {
        self.on_error = on_error;
        self
    }

    pub fn task_config(&self) -> TaskConfig {
        TaskConfig {
            codec: CodecOptions {
                level: self.level,
                format: self.format,
            },
            buffer_cap: self.buffer_cap,
            truncation: self.truncation,
        }
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.profile.clone(), self.task_config(), self.on_error)
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_dir.is_empty() {
            return Err(VzipError::Invocation("input directory is empty".into()));
        }
        self.profile.validate()?;
        self.task_config().validate()
    }
}

/// Result of a successful run.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub snapshot: TelemetrySnapshot,
    pub report: DispatchReport,
    /// Sorted paths actually stored, index i <-> archive entry i.
    pub paths: Vec<String>,
}

/// Scan, compress and write. The archive is only created after every
/// compression task has finished.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineOutcome> {
    config.validate()?;
    let mut timer = TelemetryTimer::new();
    let mut counters = TelemetryCounters::default();

    // ---- Catalog ----
    let mut catalog: Catalog = timer.time(Stage::Scan, || scan_dir(&config.input_dir))?;
    counters.files_found = catalog.len() as u64;

    // ---- Compression ----
    let report = config.dispatcher().run(&mut catalog)?;
    counters.merge(&report.stats.counters);
    timer.stage_times.merge(&report.stats.stage_times);

    let dropped = catalog.remove_unfilled();
    if !dropped.is_empty() {
        info!(dropped = dropped.len(), "skipped frames left out of the archive");
    }

    // ---- Archive ----
    let totals = timer.time(Stage::Write, || write_archive(&config.output, &catalog))?;
    counters.archive_bytes = totals.archive_bytes;

    timer.finish();
    let snapshot = TelemetrySnapshot::from(&counters, &timer, report.workers, report.waves.clone());
    info!(
        files = snapshot.files_compressed,
        bytes_in = snapshot.bytes_in,
        bytes_out = snapshot.bytes_out,
        elapsed_ms = snapshot.elapsed.as_millis() as u64,
        "pipeline finished"
    );

    Ok(PipelineOutcome {
        snapshot,
        report,
        paths: catalog.paths().map(str::to_owned).collect(),
    })
}
