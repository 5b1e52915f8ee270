use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, prelude::*, EnvFilter};

fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Logs go to stderr so stdout stays free for trajectory output.
pub fn setup_tracing(verbosity: u8) {
    let level = level_from_verbosity(verbosity);
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
