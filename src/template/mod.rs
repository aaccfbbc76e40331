//! Message template engine.
//!
//! This module provides:
//! - Placeholder scanning for `${key}` expressions
//! - Lookup strategies over query parameters or decoded JSON bodies
//! - Rendering with a `(???)` fallback for placeholders that do not resolve
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use webhook_bridge::template::{render, JsonLookup};
//!
//! let payload = json!({"repo": {"name": "bridge"}, "commits": [{"id": "abc123"}]});
//! let lookup = JsonLookup::new(payload);
//!
//! let message = render("Push to ${repo.name}: ${commits[0].id} by ${pusher}", &lookup);
//! assert_eq!(message, "Push to bridge: abc123 by (???)");
//! ```

mod lookup;
mod scanner;
mod substitution;

pub use lookup::{resolve_path, value_to_text, EmptyLookup, FlatLookup, JsonLookup, Lookup};
pub use scanner::scan;
pub use substitution::{render, render_detailed, Rendered, SENTINEL};
