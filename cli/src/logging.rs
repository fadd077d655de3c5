//! Tracing initialization.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr subscriber.
///
/// `VZIP_LOG` wins when set (e.g. `VZIP_LOG=vzip_core::dispatch=debug`);
/// otherwise the level follows the `-v` count.
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "vzip=warn,vzip_core=warn",
        1 => "vzip=info,vzip_core=info",
        2 => "vzip=debug,vzip_core=debug",
        _ => "vzip=trace,vzip_core=trace",
    };
    let filter = EnvFilter::try_from_env("VZIP_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(verbose > 0),
        )
        .with(filter)
        .init();
}
