//! Record formatting from line templates
//!
//! Templates use `{timestamp}`, `{level}`, `{name}` and `{message}`
//! placeholders; `{{` and `}}` produce literal braces.

use chrono::{DateTime, Local};
use rotalog_core::constants::TIMESTAMP_FORMAT;
use rotalog_core::{Error, Level, Result};

/// A single log record passing through the facade
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub name: &'a str,
    pub level: Level,
    pub message: &'a str,
    pub timestamp: DateTime<Local>,
}

/// Render `template` for `record`
pub fn render(template: &str, record: &Record<'_>) -> Result<String> {
    let mut out = String::with_capacity(template.len() + record.message.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(k) => key.push(k),
                        None => {
                            return Err(Error::format(format!(
                                "unclosed placeholder in '{}'",
                                template
                            )))
                        }
                    }
                }
                match key.as_str() {
                    "timestamp" => {
                        out.push_str(&record.timestamp.format(TIMESTAMP_FORMAT).to_string())
                    }
                    "level" => out.push_str(record.level.as_str()),
                    "name" => out.push_str(record.name),
                    "message" => out.push_str(record.message),
                    other => {
                        return Err(Error::format(format!("unknown placeholder '{{{}}}'", other)))
                    }
                }
            }
            '}' => {
                return Err(Error::format(format!("stray '}}' in '{}'", template)));
            }
            c => out.push(c),
        }
    }
    Ok(out)
}

/// Check a template without a real record
pub fn validate(template: &str) -> Result<()> {
    let probe = Record {
        name: "",
        level: Level::Info,
        message: "",
        timestamp: Local::now(),
    };
    render(template, &probe).map(|_| ())
}

/// Minimal format used when a template cannot be rendered
pub fn fallback(record: &Record<'_>) -> String {
    format!("{}:{}:{}", record.level, record.name, record.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record<'a>(name: &'a str, level: Level, message: &'a str) -> Record<'a> {
        Record {
            name,
            level,
            message,
            timestamp: Local::now(),
        }
    }

    #[test]
    fn test_render_placeholders() {
        let rec = record("com.app.db", Level::Warning, "slow query");
        let line = render("{level} {name}: {message}", &rec).unwrap();
        assert_eq!(line, "WARNING com.app.db: slow query");
    }

    #[test]
    fn test_render_timestamp() {
        let rec = record("a", Level::Info, "m");
        let line = render("{timestamp} {message}", &rec).unwrap();
        assert!(line.starts_with("20")); // year comes first
        assert!(line.ends_with(" m"));
    }

    #[test]
    fn test_render_escaped_braces() {
        let rec = record("a", Level::Info, "m");
        assert_eq!(render("{{{level}}}", &rec).unwrap(), "{INFO}");
    }

    #[test]
    fn test_render_unknown_placeholder() {
        let rec = record("a", Level::Info, "m");
        assert!(matches!(
            render("{thread} {message}", &rec),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_render_unclosed_placeholder() {
        let rec = record("a", Level::Info, "m");
        assert!(render("{message", &rec).is_err());
        assert!(render("oops}", &rec).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(validate("{level}:{name}:{message}").is_ok());
        assert!(validate("{nope}").is_err());
    }

    #[test]
    fn test_fallback() {
        let rec = record("com.app", Level::Error, "boom");
        assert_eq!(fallback(&rec), "ERROR:com.app:boom");
    }
}
