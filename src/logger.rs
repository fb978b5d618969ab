//! Minimal stderr backend for the `log` facade.

use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// `verbose` 0 keeps warnings and errors, 1 adds info, 2+ adds debug.
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Installs the logger; later calls only change the level.
pub fn init(verbose: u8) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level_for(verbose));
}
