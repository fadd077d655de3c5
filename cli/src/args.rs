use std::path::PathBuf;

use clap::builder::TypedValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use vzip_core::compression::{StreamFormat, TruncationPolicy};
use vzip_core::constants::{BUFFER_CAP, DEFAULT_ARCHIVE_NAME, DEFAULT_COMPRESSION_LEVEL, DEFAULT_POOL_CAPACITY};
use vzip_core::dispatch::{ErrorPolicy, SchedulePolicy};
use vzip_core::PipelineConfig;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Schedule {
    /// Batches of N tasks with a full join between batches
    Waves,
    /// N workers draining a shared queue
    Queue,
}

impl From<Schedule> for SchedulePolicy {
    fn from(s: Schedule) -> Self {
        match s {
            Schedule::Waves => SchedulePolicy::Waves,
            Schedule::Queue => SchedulePolicy::Queue,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "vzip", version, about = "Compress a directory of .ppm frames into one archive")]
pub struct Args {
    /// Directory holding the frame files
    pub dir: String,

    /// Archive to write
    #[arg(short, long, default_value = DEFAULT_ARCHIVE_NAME)]
    pub output: PathBuf,

    /// Maximum number of concurrent compression tasks
    #[arg(short = 'j', long = "jobs", default_value_t = DEFAULT_POOL_CAPACITY,
          value_parser = clap::value_parser!(u32).range(1..).map(|v| v as usize))]
    pub jobs: usize,

    /// Size the pool from CPU count and free memory instead of --jobs
    #[arg(long, conflicts_with = "jobs")]
    pub auto_jobs: bool,

    #[arg(long, value_enum, default_value_t = Schedule::Queue)]
    pub schedule: Schedule,

    /// Deflate level
    #[arg(long, default_value_t = DEFAULT_COMPRESSION_LEVEL,
          value_parser = clap::value_parser!(u32).range(0..=9))]
    pub level: u32,

    /// Per-file buffer size in bytes
    #[arg(long, default_value_t = BUFFER_CAP, hide = true)]
    pub buffer_cap: usize,

    /// Emit bare deflate streams instead of zlib-wrapped ones
    #[arg(long)]
    pub raw: bool,

    /// Fail on frames larger than the buffer instead of truncating them
    #[arg(long)]
    pub reject_oversize: bool,

    /// Leave unreadable frames out of the archive instead of aborting
    #[arg(long)]
    pub skip_errors: bool,

    /// Print run statistics as JSON on stdout
    #[arg(long)]
    pub stats_json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn to_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::new(self.dir.clone())
            .output(&self.output)
            .pool_capacity(self.jobs)
            .schedule(self.schedule.into())
            .buffer_cap(self.buffer_cap)
            .level(self.level)
            .format(if self.raw { StreamFormat::Raw } else { StreamFormat::Zlib })
            .truncation(if self.reject_oversize {
                TruncationPolicy::Reject
            } else {
                TruncationPolicy::Truncate
            })
            .on_error(if self.skip_errors { ErrorPolicy::Skip } else { ErrorPolicy::Halt });

        if self.auto_jobs {
            let dynamic = vzip_core::dispatch::ParallelismProfile::dynamic_default(self.buffer_cap);
            config = config.pool_capacity(dynamic.pool_capacity);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library() {
        let args = Args::try_parse_from(["vzip", "frames"]).unwrap();
        let config = args.to_config();
        assert_eq!(config.input_dir, "frames");
        assert_eq!(config.output, PathBuf::from(DEFAULT_ARCHIVE_NAME));
        assert_eq!(config.profile.pool_capacity, DEFAULT_POOL_CAPACITY);
        assert_eq!(config.profile.schedule, SchedulePolicy::Queue);
        assert_eq!(config.format, StreamFormat::Zlib);
        assert_eq!(config.truncation, TruncationPolicy::Truncate);
        assert_eq!(config.on_error, ErrorPolicy::Halt);
    }

    #[test]
    fn flags_map_onto_config() {
        let args = Args::try_parse_from([
            "vzip", "frames", "-o", "out.vzip", "-j", "3", "--schedule", "waves", "--level", "1", "--raw",
            "--reject-oversize", "--skip-errors",
        ])
        .unwrap();
        let config = args.to_config();
        assert_eq!(config.output, PathBuf::from("out.vzip"));
        assert_eq!(config.profile.pool_capacity, 3);
        assert_eq!(config.profile.schedule, SchedulePolicy::Waves);
        assert_eq!(config.level, 1);
        assert_eq!(config.format, StreamFormat::Raw);
        assert_eq!(config.truncation, TruncationPolicy::Reject);
        assert_eq!(config.on_error, ErrorPolicy::Skip);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(Args::try_parse_from(["vzip", "frames", "-j", "0"]).is_err());
        assert!(Args::try_parse_from(["vzip", "frames", "--level", "10"]).is_err());
        assert!(Args::try_parse_from(["vzip", "frames", "-j", "2", "--auto-jobs"]).is_err());
        assert!(Args::try_parse_from(["vzip"]).is_err());
    }
}
