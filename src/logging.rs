use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset and no `-v` was given.
pub const DEFAULT_LEVEL: &str = "warn";

pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => DEFAULT_LEVEL,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber, writing to stderr so that stdout only
/// carries results. `log` records from the models are forwarded to it.
///
/// An explicit `-v` wins over `RUST_LOG`.
pub fn init(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL)),
        _ => EnvFilter::new(level_for(verbosity)),
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .init();
}
