//! Placeholder scanner for `${...}` expressions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches `${identifier}` where identifier is any run of non-`}` characters.
    pub(crate) static ref PLACEHOLDER_RE: Regex = Regex::new(r"\$\{([^}]+)\}").unwrap();
}

/// Extract placeholder identifiers from a template in order of appearance.
///
/// Duplicates are kept. Unterminated placeholders such as `${name` are not
/// matched and produce nothing.
pub fn scan(template: &str) -> Vec<String> {
    PLACEHOLDER_RE
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}
