//! Tracing setup for the server binary.
//!
//! Unlike a one-shot CLI tool, this process keeps running, so logs go to
//! stdout rather than a per-run file, and the level is controlled by
//! `RUST_LOG` through `EnvFilter` instead of being hardcoded.

use tracing_subscriber::{fmt, EnvFilter};

/// Will panic on error: a server that cannot log is not safe to run.
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let timer = fmt::time::UtcTime::new(
        time::format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")
            .expect("hardcoded time format is valid"),
    );

    fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_target(true)
        .init();
}
