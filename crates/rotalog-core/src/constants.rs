//! Constants and default values for Rotalog

/// Default properties file name
pub const CONFIG_FILE: &str = "log.properties";

/// Default active log file for file appenders
pub const DEFAULT_LOG_FILE: &str = "./log.txt";

/// Default number of rotated files to keep
pub const DEFAULT_BACKUPS: usize = 5;

/// Default line template (classic LEVEL:name:message shape)
pub const DEFAULT_FORMAT: &str = "{level}:{name}:{message}";

/// Date pattern for the label of rotated files
pub const DATE_SUFFIX: &str = "%Y-%m-%d";

/// Timestamp pattern for the `{timestamp}` placeholder
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Rotation interval in seconds (daily at midnight)
pub const SECS_PER_DAY: i64 = 86_400;
