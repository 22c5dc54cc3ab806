//! Output sinks: rotating files and the colored console

use colored::Colorize;
use parking_lot::Mutex;
use rotalog_core::constants::DEFAULT_FORMAT;
use rotalog_core::{AppenderConfig, AppenderKind, Level, Result};
use tracing::warn;

use crate::format::{self, Record};
use crate::rotation::RollingFile;

/// A destination for formatted records
pub enum Sink {
    File(FileSink),
    Console(ConsoleSink),
}

impl Sink {
    /// Build a sink from its appender configuration. File appenders
    /// open their active file eagerly; an open failure is fatal for
    /// this sink.
    pub fn from_config(config: &AppenderConfig) -> Result<Sink> {
        let template = checked_template(config);
        match config.kind {
            AppenderKind::File => Ok(Sink::File(FileSink {
                name: config.name.clone(),
                min_level: config.min_level,
                template,
                state: Mutex::new(RollingFile::open(
                    config.file.clone(),
                    config.backups,
                    false,
                    false,
                )?),
            })),
            AppenderKind::Console => Ok(Sink::Console(ConsoleSink {
                min_level: config.min_level,
                template,
            })),
        }
    }

    pub fn min_level(&self) -> Level {
        match self {
            Sink::File(s) => s.min_level,
            Sink::Console(s) => s.min_level,
        }
    }

    /// Deliver a record. Filtering on the sink threshold happens here;
    /// write failures go to the diagnostic channel and never reach the
    /// logging caller.
    pub fn emit(&self, record: &Record<'_>) {
        match self {
            Sink::File(s) => s.emit(record),
            Sink::Console(s) => s.emit(record),
        }
    }

    /// Flush buffered output (file sinks)
    pub fn flush(&self) {
        if let Sink::File(s) = self {
            if let Err(e) = s.state.lock().flush() {
                warn!("appender {}: {}", s.name, e);
            }
        }
    }
}

/// File sink backed by a rotating file
pub struct FileSink {
    name: String,
    min_level: Level,
    template: String,
    /// Serializes the check-rollover-then-write sequence
    state: Mutex<RollingFile>,
}

impl FileSink {
    fn emit(&self, record: &Record<'_>) {
        if record.level < self.min_level {
            return;
        }
        let line =
            format::render(&self.template, record).unwrap_or_else(|_| format::fallback(record));
        let mut state = self.state.lock();
        if let Err(e) = state.write_line(&line) {
            warn!("appender {}: {}", self.name, e);
        }
    }
}

/// Console sink writing level-colored lines to stderr
pub struct ConsoleSink {
    min_level: Level,
    template: String,
}

impl ConsoleSink {
    fn emit(&self, record: &Record<'_>) {
        if record.level < self.min_level {
            return;
        }
        let line =
            format::render(&self.template, record).unwrap_or_else(|_| format::fallback(record));
        let line = match record.level {
            Level::Debug | Level::Info => line.white(),
            Level::Warning => line.yellow(),
            Level::Error | Level::Critical => line.red(),
        };
        eprintln!("{}", line);
    }
}

/// Validate the configured template, falling back to the default when
/// it is malformed
fn checked_template(config: &AppenderConfig) -> String {
    match format::validate(&config.format) {
        Ok(()) => config.format.clone(),
        Err(e) => {
            warn!("appender {}: {}, using default format", config.name, e);
            DEFAULT_FORMAT.to_string()
        }
    }
}
