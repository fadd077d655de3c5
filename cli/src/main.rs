mod args;
mod logging;

use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use crate::args::Args;

fn main() -> ExitCode {
    let start = Instant::now();
    let args = Args::parse();
    logging::init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => {
            println!("Time: {:.2} seconds", start.elapsed().as_secs_f64());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("vzip: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.to_config();
    let outcome = vzip_core::run_pipeline(&config)
        .with_context(|| format!("compressing frames from '{}'", args.dir))?;

    for skipped in &outcome.report.skipped {
        warn!(path = %skipped.path, error = %skipped.error, "frame left out of the archive");
    }

    if args.stats_json {
        let json = outcome.snapshot.to_json().context("serializing run statistics")?;
        println!("{json}");
    }
    Ok(())
}
