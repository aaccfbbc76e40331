//! Placeholder lookup strategies.
//!
//! The renderer never touches a request payload directly. Each request builds a
//! [`Lookup`] over its own payload and hands it to [`super::render`].

use std::collections::HashMap;

use serde_json::Value;

/// Resolves a placeholder key to its text value, or `None` when absent.
pub trait Lookup {
    fn resolve(&self, key: &str) -> Option<String>;
}

impl<F> Lookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Single-level lookup over string parameters (query string style).
///
/// Keys are matched verbatim; no dotted-path or index grammar applies.
#[derive(Debug, Clone, Default)]
pub struct FlatLookup {
    params: HashMap<String, String>,
}

impl FlatLookup {
    pub fn new(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Drop a parameter so it can never be rendered (e.g. the auth token).
    pub fn without(mut self, key: &str) -> Self {
        self.params.remove(key);
        self
    }
}

impl Lookup for FlatLookup {
    fn resolve(&self, key: &str) -> Option<String> {
        self.params.get(key).cloned()
    }
}

/// Lookup that never resolves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyLookup;

impl Lookup for EmptyLookup {
    fn resolve(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Dotted-path lookup over a decoded JSON document.
///
/// Paths look like `a.b[2].c`. Every mismatch along the way (missing key, wrong
/// type, bad or out-of-range index) yields `None`.
#[derive(Debug, Clone)]
pub struct JsonLookup {
    root: Value,
}

impl JsonLookup {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }
}

impl Lookup for JsonLookup {
    fn resolve(&self, key: &str) -> Option<String> {
        resolve_path(&self.root, key).and_then(value_to_text)
    }
}

/// Walk `root` along a dotted path, returning the value it points at.
///
/// Composite values are returned as-is; [`value_to_text`] decides how they render.
pub fn resolve_path<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    let mut pointer = root;

    for segment in key.split('.') {
        if pointer.is_null() {
            return None;
        }

        let (name, indices) = parse_segment(segment)?;
        pointer = pointer.as_object()?.get(name)?;

        for index in indices {
            pointer = pointer.as_array()?.get(index)?;
        }
    }

    Some(pointer)
}

/// Split `name[1][2]` into `("name", [1, 2])`.
///
/// Returns `None` for anything malformed: unclosed brackets, non-numeric or
/// negative indices, or text trailing a closing bracket.
fn parse_segment(segment: &str) -> Option<(&str, Vec<usize>)> {
    let Some(open) = segment.find('[') else {
        return Some((segment, Vec::new()));
    };

    let name = &segment[..open];
    let mut rest = &segment[open..];
    let mut indices = Vec::new();

    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        let literal = &inner[..close];

        if literal.is_empty() || !literal.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        indices.push(literal.parse::<usize>().ok()?);

        rest = &inner[close + 1..];
    }

    Some((name, indices))
}

/// Convert a resolved JSON value to message text.
///
/// Strings are used verbatim, numbers and booleans in their JSON form, and
/// objects/arrays as compact JSON. Null counts as absent.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // For arrays and objects, use JSON representation
        _ => Some(value.to_string()),
    }
}
