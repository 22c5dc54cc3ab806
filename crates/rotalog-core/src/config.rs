//! Logging configuration assembled from a properties file
//!
//! Recognized keys:
//! - `rootLogger` - default level when no namespace override matches
//! - `appender.<name>.type` - `file` or `console` (required)
//! - `appender.<name>.level` - minimum level for the appender
//! - `appender.<name>.file` - active log file path (file appenders)
//! - `appender.<name>.backups` - rotated files to keep, 0 keeps all
//! - `appender.<name>.formatter` - line template
//! - `logger.<namespace>` - level override for a namespace prefix

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_BACKUPS, DEFAULT_FORMAT, DEFAULT_LOG_FILE};
use crate::error::{Error, Result};
use crate::level::Level;
use crate::properties::Properties;

/// Kind of destination an appender writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppenderKind {
    File,
    Console,
}

impl AppenderKind {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "file" => Some(AppenderKind::File),
            "console" => Some(AppenderKind::Console),
            _ => None,
        }
    }
}

/// A single configured appender. Immutable after load.
#[derive(Debug, Clone)]
pub struct AppenderConfig {
    pub name: String,
    pub kind: AppenderKind,
    /// Minimum level this appender accepts
    pub min_level: Level,
    /// Active log file path (file appenders only)
    pub file: PathBuf,
    /// Rotated files to keep; 0 keeps everything
    pub backups: usize,
    /// Line template
    pub format: String,
}

/// Full logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level applied when no namespace override matches
    pub root_level: Level,
    pub appenders: Vec<AppenderConfig>,
    /// Namespace prefix -> configured level name. Names stay raw so an
    /// unrecognized value degrades to the root level at resolve time.
    pub namespace_levels: HashMap<String, String>,
}

impl LogConfig {
    /// Load configuration from a properties file
    pub fn load(path: &Path) -> Result<Self> {
        let props = Properties::load(path)?;
        Self::from_properties(&props)
    }

    /// Build configuration from parsed properties
    pub fn from_properties(props: &Properties) -> Result<Self> {
        // Unrecognized root level names silently fall back to INFO.
        let root_level = props
            .get("rootLogger")
            .and_then(Level::parse)
            .unwrap_or(Level::Info);

        let mut grouped: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut namespace_levels = HashMap::new();

        for (key, value) in props.iter() {
            if let Some(rest) = key.strip_prefix("appender.") {
                // appender.<name>.<field> with a single-segment name
                let mut parts = rest.splitn(2, '.');
                match (parts.next(), parts.next()) {
                    (Some(name), Some(field))
                        if !name.is_empty() && !field.is_empty() && !field.contains('.') =>
                    {
                        grouped
                            .entry(name.to_string())
                            .or_default()
                            .insert(field.to_string(), value.to_string());
                    }
                    _ => continue,
                }
            } else if let Some(ns) = key.strip_prefix("logger.") {
                if !ns.is_empty() {
                    namespace_levels.insert(ns.to_string(), value.to_string());
                }
            }
        }

        let appenders = grouped
            .into_iter()
            .map(|(name, fields)| AppenderConfig::from_fields(name, &fields))
            .collect::<Result<Vec<_>>>()?;

        Ok(LogConfig {
            root_level,
            appenders,
            namespace_levels,
        })
    }
}

impl AppenderConfig {
    fn from_fields(name: String, fields: &BTreeMap<String, String>) -> Result<Self> {
        let kind = match fields.get("type") {
            Some(raw) => AppenderKind::parse(raw).ok_or_else(|| {
                Error::config(format!("appender {}: unknown type '{}'", name, raw))
            })?,
            None => return Err(Error::config(format!("appender {}: missing type", name))),
        };

        // Unrecognized level names silently fall back to INFO.
        let min_level = fields
            .get("level")
            .and_then(|raw| Level::parse(raw))
            .unwrap_or(Level::Info);

        let file = PathBuf::from(
            fields
                .get("file")
                .map(String::as_str)
                .unwrap_or(DEFAULT_LOG_FILE),
        );

        let backups = match fields.get("backups") {
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                Error::config(format!("appender {}: bad backups value '{}'", name, raw))
            })?,
            None => DEFAULT_BACKUPS,
        };

        let format = fields
            .get("formatter")
            .cloned()
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string());

        Ok(AppenderConfig {
            name,
            kind,
            min_level,
            file,
            backups,
            format,
        })
    }
}
