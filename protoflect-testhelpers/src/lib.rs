#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub use color_eyre::eyre;

use std::io::Write;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::OwoColorize;

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let level = match record.level() {
            Level::Error => record.level().red().to_string(),
            Level::Warn => record.level().yellow().to_string(),
            Level::Info => record.level().green().to_string(),
            Level::Debug => record.level().blue().to_string(),
            Level::Trace => record.level().dimmed().to_string(),
        };
        eprintln!("{} {}: {}", level, record.target().cyan(), record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

/// Installs the color-eyre error hook and a stderr logger at trace level.
///
/// Call at the top of every test; repeated calls are no-ops.
pub fn setup() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        color_eyre::install().expect("failed to install color-eyre");
        log::set_logger(&LOGGER).expect("failed to install logger");
        log::set_max_level(LevelFilter::Trace);
    });
}
