//! Logger setup for the `scm` binary.
//!
//! The library logs through the `log` facade; the binary installs
//! `env_logger` once at startup. Informational lines are printed as bare
//! messages, everything else carries its level.

use std::io::Write;

use env_logger::{Builder, Target};
use log::{Level, LevelFilter};

use crate::error::{Error, Result};

/// Parses a `--log-level` value.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    match level.trim().to_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        other => Err(Error::invalid(format!(
            "unknown log level '{}': expected error, warn, info, debug or trace",
            other
        ))),
    }
}

fn prefix(level: Level) -> &'static str {
    match level {
        Level::Error => "error: ",
        Level::Warn => "warning: ",
        Level::Info => "",
        Level::Debug => "debug: ",
        Level::Trace => "trace: ",
    }
}

/// Installs the global logger writing to stderr.
///
/// `RUST_LOG`, when set, refines the filter on top of `level`. Calling this
/// twice is harmless; the second call is ignored.
pub fn init(level: LevelFilter) {
    let mut builder = Builder::new();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder
        .target(Target::Stderr)
        .format(|buf, record| writeln!(buf, "{}{}", prefix(record.level()), record.args()));
    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
}
