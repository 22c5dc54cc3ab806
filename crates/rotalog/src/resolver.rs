//! Namespace-scoped level resolution

use std::collections::HashMap;

use rotalog_core::Level;

/// Resolves the effective level of a logger name by longest configured
/// namespace prefix. Read-only after construction; resolution is a
/// pure lookup with no locking.
#[derive(Debug, Clone)]
pub struct LevelResolver {
    default_level: Level,
    /// Namespace -> configured level name. Names stay unparsed so an
    /// unrecognized value degrades to the default instead of failing.
    table: HashMap<String, String>,
}

impl LevelResolver {
    pub fn new(default_level: Level, table: HashMap<String, String>) -> Self {
        Self {
            default_level,
            table,
        }
    }

    pub fn default_level(&self) -> Level {
        self.default_level
    }

    /// Effective level for `name`: the level of the longest namespace
    /// that is `name` itself or a dot-delimited ancestor of it. Falls
    /// back to the default when nothing matches or the matched entry's
    /// level name is unrecognized.
    pub fn resolve(&self, name: &str) -> Level {
        if name.is_empty() {
            return self.default_level;
        }
        let mut best: Option<(&String, &String)> = None;
        for (ns, level_name) in &self.table {
            if !covers(ns, name) {
                continue;
            }
            match best {
                Some((current, _)) if current.len() >= ns.len() => {}
                _ => best = Some((ns, level_name)),
            }
        }
        best.and_then(|(_, level_name)| Level::parse(level_name))
            .unwrap_or(self.default_level)
    }
}

/// Whether namespace `ns` scopes logger `name`: exact match, or `ns`
/// followed by `.` is a literal prefix of `name`
fn covers(ns: &str, name: &str) -> bool {
    if ns == name {
        return true;
    }
    name.len() > ns.len() && name.starts_with(ns) && name.as_bytes()[ns.len()] == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(entries: &[(&str, &str)]) -> LevelResolver {
        let table = entries
            .iter()
            .map(|(ns, level)| (ns.to_string(), level.to_string()))
            .collect();
        LevelResolver::new(Level::Info, table)
    }

    #[test]
    fn test_longest_prefix_wins() {
        let r = resolver(&[("com", "WARNING"), ("com.app", "DEBUG"), ("com.app.db", "ERROR")]);
        assert_eq!(r.resolve("com.app.db.pool"), Level::Error);
        assert_eq!(r.resolve("com.app.net"), Level::Debug);
        assert_eq!(r.resolve("com.other"), Level::Warning);
    }

    #[test]
    fn test_exact_match_beats_ancestor() {
        let r = resolver(&[("com.app", "DEBUG"), ("com.app.db", "ERROR")]);
        assert_eq!(r.resolve("com.app.db"), Level::Error);
        assert_eq!(r.resolve("com.app"), Level::Debug);
    }

    #[test]
    fn test_no_match_returns_default() {
        let r = resolver(&[("com.app", "DEBUG")]);
        assert_eq!(r.resolve("org.example"), Level::Info);
        assert_eq!(r.resolve("com"), Level::Info);
    }

    #[test]
    fn test_empty_name_returns_default() {
        let r = resolver(&[("com.app", "DEBUG")]);
        assert_eq!(r.resolve(""), Level::Info);
    }

    #[test]
    fn test_prefix_requires_separator() {
        // "com.app" must not cover "com.appx".
        let r = resolver(&[("com.app", "DEBUG")]);
        assert_eq!(r.resolve("com.appx"), Level::Info);
        assert_eq!(r.resolve("com.appx.db"), Level::Info);
    }

    #[test]
    fn test_unrecognized_level_falls_back() {
        let r = resolver(&[("com.app", "VERBOSE"), ("com", "ERROR")]);
        // The longest match still wins the lookup; its bad level name
        // then degrades to the default rather than the shorter match.
        assert_eq!(r.resolve("com.app.db"), Level::Info);
        assert_eq!(r.resolve("com.other"), Level::Error);
    }

    #[test]
    fn test_default_level_accessor() {
        let r = resolver(&[]);
        assert_eq!(r.default_level(), Level::Info);
    }
}
