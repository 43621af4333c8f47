//! Logging setup.
//!
//! Uses the `log` facade with an `env_logger` backend. The level is picked by
//! (in priority order):
//!
//! 1. the `RUST_LOG` environment variable, if set
//! 2. the `--verbose` flag (debug level)
//! 3. default: warnings only
//!
//! The progress stream on stdout is the primary user surface; logging is the
//! secondary channel for decode details and skipped entries, so it stays
//! quiet by default.

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Initialize the logging subsystem. Call once, before any logging.
pub fn init_logging(verbose: bool) {
    let mut builder = Builder::new();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose));
    }

    // Compact single-line format; records go to stderr so they never
    // interleave with the progress markers on stdout.
    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
    });

    builder.init();
}

fn determine_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}
