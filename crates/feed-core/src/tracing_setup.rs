use std::fs::OpenOptions;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialise tracing for a binary.
///
/// By default events go to stderr, filtered by `RUST_LOG` (defaulting to
/// `warn` so a full-screen UI stays readable). Setting `FEED_LOG_FILE`
/// routes a DEBUG-level copy to that file instead, for debugging a live
/// session without disturbing the terminal.
pub fn init_tracing() {
    match std::env::var("FEED_LOG_FILE") {
        Ok(log_path) => {
            init_file_logging(&log_path);
            eprintln!("File logging enabled: {}", log_path);
        }
        Err(_) => init_stderr_logging(),
    }
}

fn init_file_logging(log_path: &str) {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .expect("Failed to open log file");

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG);

    tracing_subscriber::registry().with(file_layer).init();
}

fn init_stderr_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(stderr_layer).init();
}
