//! Explicit logging context and the logger facade

use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use rotalog_core::{Level, LogConfig, Result};
use tracing::warn;

use crate::format::Record;
use crate::resolver::LevelResolver;
use crate::sink::Sink;

struct Shared {
    resolver: LevelResolver,
    sinks: Vec<Sink>,
}

/// Process-wide logging state, constructed once from configuration and
/// passed explicitly. Owns the namespace level table and every sink.
#[derive(Clone)]
pub struct LoggingContext {
    shared: Arc<Shared>,
}

impl LoggingContext {
    /// Build a context from parsed configuration. An appender whose
    /// file cannot be opened is dropped with a warning; the remaining
    /// appenders keep working.
    pub fn from_config(config: &LogConfig) -> Self {
        let mut sinks = Vec::new();
        for appender in &config.appenders {
            match Sink::from_config(appender) {
                Ok(sink) => sinks.push(sink),
                Err(e) => warn!("appender {} disabled: {}", appender.name, e),
            }
        }
        let resolver = LevelResolver::new(config.root_level, config.namespace_levels.clone());
        Self {
            shared: Arc::new(Shared { resolver, sinks }),
        }
    }

    /// Load a properties file and build a context from it
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_config(&LogConfig::load(path)?))
    }

    /// A logger bound to `name`, with its effective level resolved
    /// against the namespace table
    pub fn get_logger(&self, name: &str) -> Logger {
        Logger {
            effective: self.shared.resolver.resolve(name),
            name: name.to_string(),
            shared: Arc::clone(&self.shared),
        }
    }

    /// Route one record: dropped when below the effective level for
    /// `name`, otherwise delivered to every sink accepting `level`
    pub fn log(&self, name: &str, level: Level, message: &str) {
        if level < self.shared.resolver.resolve(name) {
            return;
        }
        deliver(&self.shared, name, level, message);
    }

    /// Flush buffered file output
    pub fn flush(&self) {
        for sink in &self.shared.sinks {
            sink.flush();
        }
    }
}

fn deliver(shared: &Shared, name: &str, level: Level, message: &str) {
    let record = Record {
        name,
        level,
        message,
        timestamp: Local::now(),
    };
    for sink in &shared.sinks {
        sink.emit(&record);
    }
}

/// A named logger bound to its context. Cheap to clone and hand out.
#[derive(Clone)]
pub struct Logger {
    name: String,
    effective: Level,
    shared: Arc<Shared>,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn effective_level(&self) -> Level {
        self.effective
    }

    /// Log `message` at `level`. Records below the effective level are
    /// dropped silently; sink failures never propagate to the caller.
    pub fn log(&self, level: Level, message: &str) {
        if level < self.effective {
            return;
        }
        deliver(&self.shared, &self.name, level, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    pub fn critical(&self, message: &str) {
        self.log(Level::Critical, message);
    }
}
