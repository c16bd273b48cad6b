use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_DIR: &str = "logs";

/// Sets up console logging plus a daily-rotated JSON log file.
///
/// Stage runs are long and mostly quiet; the file log keeps the per-record
/// drop/parse diagnostics that would drown the console at info level.
pub fn init_logging() {
    let _ = fs::create_dir_all(LOG_DIR);

    let file_appender = tracing_appender::rolling::daily(LOG_DIR, "cinemerge.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("cinemerge=info".parse().expect("static directive parses"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_writer(file_writer))
        .with(fmt::layer().with_writer(std::io::stdout))
        .init();

    // The guard flushes buffered log lines on drop; leak it so logging stays
    // alive for the whole process
    std::mem::forget(guard);
}
