//! Rotalog - Timed rotating file logging with namespace-scoped levels
//!
//! A [`LoggingContext`] is built once from a flat properties file and
//! passed explicitly; callers obtain [`Logger`]s from it. File
//! appenders rotate daily at midnight, keep a bounded number of dated
//! backups, and stay on schedule across DST transitions.

mod context;
mod format;
mod resolver;
mod rotation;
mod sink;

pub use context::{Logger, LoggingContext};
pub use format::Record;
pub use resolver::LevelResolver;
pub use rotation::RollingFile;
pub use sink::Sink;

pub use rotalog_core::{
    constants, AppenderConfig, AppenderKind, Error, Level, LogConfig, Properties, Result,
};
