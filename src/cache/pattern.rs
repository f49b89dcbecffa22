//! Key Pattern Module
//!
//! Glob-style key matching for `keys` and `delete_pattern`.

use regex::Regex;
use tracing::warn;

// == Key Pattern ==
/// A compiled key pattern.
///
/// `*` becomes `.*`; every other character is handed to the regex engine as-is,
/// so `.` or `?` keep their regex meaning. Matching is unanchored.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    regex: Option<Regex>,
}

impl KeyPattern {
    /// Compiles a glob. A pattern that does not form a valid regex matches nothing.
    pub fn new(glob: &str) -> Self {
        let source = glob.replace('*', ".*");
        let regex = match Regex::new(&source) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!(pattern = glob, error = %e, "Invalid cache key pattern");
                None
            }
        };
        Self { regex }
    }

    /// Checks whether the key matches.
    pub fn matches(&self, key: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(key))
    }
}
