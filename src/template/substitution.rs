//! Template rendering: `${...}` placeholder substitution

use regex::Captures;

use super::lookup::Lookup;
use super::scanner::PLACEHOLDER_RE;

/// Text inserted for placeholders that fail to resolve.
pub const SENTINEL: &str = "(???)";

/// Outcome of a render, including which placeholders fell back to the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Keys that resolved to nothing, one entry per occurrence
    pub unresolved: Vec<String>,
}

/// Render a template, replacing every `${key}` with its resolved value or [`SENTINEL`].
pub fn render(template: &str, lookup: &dyn Lookup) -> String {
    render_detailed(template, lookup).text
}

/// Like [`render`] but also reports the unresolved keys.
///
/// Substitution is a single pass over the original template, so text coming
/// from a resolved value is never scanned for further placeholders.
pub fn render_detailed(template: &str, lookup: &dyn Lookup) -> Rendered {
    let mut unresolved = Vec::new();

    let text = PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            let key = &caps[1];
            match lookup.resolve(key) {
                Some(value) => value,
                None => {
                    unresolved.push(key.to_string());
                    SENTINEL.to_string()
                }
            }
        })
        .into_owned();

    Rendered { text, unresolved }
}
