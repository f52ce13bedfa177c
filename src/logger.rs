use std::{fmt::Arguments, time::Duration};

use log::{LevelFilter, Log, SetLoggerError};

use crate::clock::{Clock, MonotonicClock};

/// Prints one line per record to the console, prefixed by the uptime.
pub struct ConsoleLogger {
    clock: MonotonicClock,
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(Self {
            clock: MonotonicClock::new(),
            level,
        }))?;
        log::set_max_level(level);
        Ok(())
    }
}

fn format_line(uptime: Duration, level: log::Level, target: &str, args: &Arguments) -> String {
    format!(
        "[{:>5}.{:03} {:<5} {}] {}",
        uptime.as_secs(),
        uptime.subsec_millis(),
        level,
        target,
        args
    )
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            println!(
                "{}",
                format_line(self.clock.uptime(), record.level(), record.target(), record.args())
            );
        }
    }

    fn flush(&self) {}
}
