//! Flat key=value properties file parsing

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};

/// A flat `key=value` configuration file. Lines starting with `#` and
/// lines without `=` are ignored; whitespace around keys and values is
/// trimmed. The value runs from the first `=` to the end of the line.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Load and parse a properties file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse properties from a string
    pub fn parse(content: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(pos) = line.find('=') {
                if pos == 0 {
                    continue;
                }
                let key = line[..pos].trim().to_string();
                let value = line[pos + 1..].trim().to_string();
                entries.insert(key, value);
            }
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.as_str())
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic() {
        let props = Properties::parse(
            "# log configuration\n\
             rootLogger = INFO\n\
             appender.a.type=file\n\
             \n\
             not a property line\n",
        );
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("rootLogger"), Some("INFO"));
        assert_eq!(props.get("appender.a.type"), Some("file"));
        assert_eq!(props.get("missing"), None);
    }

    #[test]
    fn test_parse_value_keeps_equals() {
        let props = Properties::parse("appender.a.formatter={level}={message}\n");
        assert_eq!(props.get("appender.a.formatter"), Some("{level}={message}"));
    }

    #[test]
    fn test_parse_skips_comments_and_empty_keys() {
        let props = Properties::parse("# key=value\n=nokey\n");
        assert!(props.is_empty());
    }

    #[test]
    fn test_get_or() {
        let props = Properties::parse("a=1\n");
        assert_eq!(props.get_or("a", "x"), "1");
        assert_eq!(props.get_or("b", "x"), "x");
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"rootLogger=DEBUG\nlogger.com.app=ERROR\n")
            .unwrap();

        let props = Properties::load(file.path()).unwrap();
        assert_eq!(props.get("rootLogger"), Some("DEBUG"));
        assert_eq!(props.get("logger.com.app"), Some("ERROR"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Properties::load(Path::new("/nonexistent/log.properties"));
        assert!(matches!(result, Err(Error::ConfigNotFound(_))));
    }
}
