mod common;

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use vzip_core::archive::read_archive;
    use vzip_core::compression::StreamFormat;
    use vzip_core::constants::BUFFER_CAP;
    use vzip_core::prelude::*;

    use crate::common::{dir_str, frame, inflate, inflate_raw, noise, write};

    fn frames_dir(dir: &Path, count: usize) -> Vec<Vec<u8>> {
        (0..count)
            .map(|i| {
                let body = frame(4096 + i * 513, i as u8);
                write(dir, &format!("frame_{i:04}.ppm"), &body);
                body
            })
            .collect()
    }

    // ------------------------------------------------------------
    // End to end
    // ------------------------------------------------------------
    #[test]
    fn archive_holds_every_frame_in_order() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let sources = frames_dir(input.path(), 7);
        write(input.path(), "notes.txt", b"ignored");

        let archive = out.path().join("video.vzip");
        let cfg = PipelineConfig::new(dir_str(input.path())).output(&archive).pool_capacity(3);
        let outcome = run_pipeline(&cfg).unwrap();

        let payloads = read_archive(&archive).unwrap();
        assert_eq!(payloads.len(), 7);
        for (payload, source) in payloads.iter().zip(&sources) {
            assert_eq!(&inflate(payload), source);
        }

        assert_eq!(outcome.paths.len(), 7);
        assert!(outcome.paths.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(outcome.snapshot.files_found, 7);
        assert_eq!(outcome.snapshot.files_compressed, 7);
        assert_eq!(outcome.snapshot.archive_bytes, fs::metadata(&archive).unwrap().len());
        assert!(outcome.snapshot.sanity_check());
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        frames_dir(input.path(), 5);

        let first = out.path().join("a.vzip");
        let second = out.path().join("b.vzip");
        let cfg = PipelineConfig::new(dir_str(input.path()));
        run_pipeline(&cfg.clone().output(&first)).unwrap();
        run_pipeline(&cfg.output(&second)).unwrap();

        assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
    }

    #[test]
    fn schedules_write_the_same_archive() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        frames_dir(input.path(), 6);

        let waves = out.path().join("waves.vzip");
        let queue = out.path().join("queue.vzip");
        let cfg = PipelineConfig::new(dir_str(input.path())).pool_capacity(4);

        let by_waves = run_pipeline(&cfg.clone().schedule(SchedulePolicy::Waves).output(&waves)).unwrap();
        run_pipeline(&cfg.schedule(SchedulePolicy::Queue).output(&queue)).unwrap();

        assert_eq!(by_waves.snapshot.waves, vec![4, 2]);
        assert_eq!(fs::read(waves).unwrap(), fs::read(queue).unwrap());
    }

    #[test]
    fn raw_format_inflates_without_header() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let sources = frames_dir(input.path(), 2);

        let archive = out.path().join("raw.vzip");
        run_pipeline(&PipelineConfig::new(dir_str(input.path())).format(StreamFormat::Raw).output(&archive)).unwrap();

        let payloads = read_archive(&archive).unwrap();
        assert_eq!(inflate_raw(&payloads[1]), sources[1]);
    }

    #[test]
    fn empty_dir_writes_empty_archive() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let archive = out.path().join("video.vzip");

        let outcome = run_pipeline(&PipelineConfig::new(dir_str(input.path())).output(&archive)).unwrap();
        assert_eq!(fs::metadata(&archive).unwrap().len(), 0);
        assert_eq!(outcome.snapshot.files_found, 0);
        assert!(outcome.paths.is_empty());
    }

    // ------------------------------------------------------------
    // Buffer boundary
    // ------------------------------------------------------------
    #[test]
    fn frame_at_capacity_is_kept_whole() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let exact = frame(BUFFER_CAP, 3);
        let over = frame(BUFFER_CAP + 1, 4);
        write(input.path(), "a.ppm", &exact);
        write(input.path(), "b.ppm", &over);

        let archive = out.path().join("video.vzip");
        let outcome = run_pipeline(&PipelineConfig::new(dir_str(input.path())).output(&archive)).unwrap();
        let payloads = read_archive(&archive).unwrap();

        assert_eq!(inflate(&payloads[0]), exact);
        assert_eq!(inflate(&payloads[1]), &over[..BUFFER_CAP]);
        assert_eq!(outcome.snapshot.files_truncated, 1);
    }

    #[test]
    fn reject_policy_fails_before_archive_exists() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(input.path(), "big.ppm", &frame(2048, 1));

        let archive = out.path().join("video.vzip");
        let cfg = PipelineConfig::new(dir_str(input.path()))
            .buffer_cap(1024)
            .truncation(TruncationPolicy::Reject)
            .output(&archive);
        assert!(matches!(run_pipeline(&cfg), Err(VzipError::Oversize { .. })));
        assert!(!archive.exists());
    }

    // ------------------------------------------------------------
    // Failures
    // ------------------------------------------------------------
    #[test]
    fn missing_dir_creates_no_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("video.vzip");
        let cfg = PipelineConfig::new(dir_str(&tmp.path().join("absent"))).output(&archive);

        let err = run_pipeline(&cfg).unwrap_err();
        assert_eq!(err.stage(), "enumerate");
        assert!(!archive.exists());
    }

    #[test]
    fn incompressible_frame_overflows() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(input.path(), "noise.ppm", &noise(4096, 5));

        let archive = out.path().join("video.vzip");
        let cfg = PipelineConfig::new(dir_str(input.path())).buffer_cap(4096).output(&archive);
        assert!(matches!(run_pipeline(&cfg), Err(VzipError::Compress { .. })));
        assert!(!archive.exists());
    }

    #[test]
    fn invalid_settings_are_invocation_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = dir_str(tmp.path());
        for cfg in [
            PipelineConfig::new(dir.clone()).pool_capacity(0),
            PipelineConfig::new(dir.clone()).level(10),
            PipelineConfig::new(dir.clone()).buffer_cap(0),
            PipelineConfig::new(""),
        ] {
            assert!(matches!(run_pipeline(&cfg), Err(VzipError::Invocation(_))));
        }
    }

    #[cfg(unix)]
    #[test]
    fn dangling_frame_is_skipped_when_asked() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let sources = frames_dir(input.path(), 2);
        std::os::unix::fs::symlink(input.path().join("gone.bin"), input.path().join("frame_0000_x.ppm")).unwrap();

        let archive = out.path().join("video.vzip");
        let halt = PipelineConfig::new(dir_str(input.path())).output(&archive);
        assert!(matches!(run_pipeline(&halt), Err(VzipError::Read { .. })));
        assert!(!archive.exists());

        let outcome = run_pipeline(&halt.on_error(ErrorPolicy::Skip)).unwrap();
        assert_eq!(outcome.report.skipped.len(), 1);
        assert_eq!(outcome.snapshot.files_skipped, 1);
        assert!(outcome.snapshot.sanity_check());

        let payloads = read_archive(&archive).unwrap();
        assert_eq!(payloads.len(), 2);
        assert_eq!(inflate(&payloads[0]), sources[0]);
        assert_eq!(inflate(&payloads[1]), sources[1]);
    }

    #[test]
    fn snapshot_serializes() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        frames_dir(input.path(), 3);

        let outcome =
            run_pipeline(&PipelineConfig::new(dir_str(input.path())).output(out.path().join("v.vzip"))).unwrap();
        let json = outcome.snapshot.to_json().unwrap();
        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.files_compressed, 3);
        assert!(back.compression_ratio > 0.0 && back.compression_ratio < 1.0);
    }
}
