//! Request payload to placeholder lookup

use std::collections::HashMap;

use crate::auth::TOKEN_PARAM;
use crate::endpoints::PayloadFormat;
use crate::error::{AppError, Result};
use crate::template::{FlatLookup, JsonLookup, Lookup};

/// A lookup built from one request, owned by that request only
pub type RequestLookup = Box<dyn Lookup + Send + Sync>;

/// Collapse query pairs into a map, keeping the first value of a repeated key
pub fn first_values(pairs: Vec<(String, String)>) -> HashMap<String, String> {
    let mut query = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        query.entry(key).or_insert(value);
    }
    query
}

/// Lookup over query parameters. The auth token is never exposed to templates.
pub fn query_lookup(query: HashMap<String, String>) -> RequestLookup {
    Box::new(FlatLookup::new(query).without(TOKEN_PARAM))
}

/// Lookup for a POST trigger, chosen by the endpoint's payload format.
///
/// JSON bodies are decoded here; a body that is not valid JSON is rejected
/// before any rendering happens.
pub fn body_lookup(
    format: PayloadFormat,
    query: HashMap<String, String>,
    body: &[u8],
) -> Result<RequestLookup> {
    match format {
        PayloadFormat::Json => {
            let root: serde_json::Value = serde_json::from_slice(body)
                .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))?;
            Ok(Box::new(JsonLookup::new(root)))
        }
        PayloadFormat::Flat => Ok(query_lookup(query)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_values_keeps_first() {
        let pairs = vec![
            ("v".to_string(), "first".to_string()),
            ("token".to_string(), "t1".to_string()),
            ("v".to_string(), "second".to_string()),
            ("token".to_string(), "t2".to_string()),
        ];

        let query = first_values(pairs);
        assert_eq!(query.len(), 2);
        assert_eq!(query["v"], "first");
        assert_eq!(query["token"], "t1");
    }

    #[test]
    fn test_query_lookup_hides_token() {
        let lookup = query_lookup(query(&[("token", "secret"), ("name", "Ann")]));
        assert_eq!(lookup.resolve("token"), None);
        assert_eq!(lookup.resolve("name"), Some("Ann".to_string()));
    }

    #[test]
    fn test_body_lookup_json() {
        let lookup = body_lookup(
            PayloadFormat::Json,
            HashMap::new(),
            br#"{"build": {"status": "green", "number": 7}}"#,
        )
        .unwrap();

        assert_eq!(lookup.resolve("build.status"), Some("green".to_string()));
        assert_eq!(lookup.resolve("build.number"), Some("7".to_string()));
    }

    #[test]
    fn test_body_lookup_invalid_json() {
        let result = body_lookup(PayloadFormat::Json, HashMap::new(), b"{not json");
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = body_lookup(PayloadFormat::Json, HashMap::new(), b"");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_body_lookup_flat_uses_query() {
        let lookup = body_lookup(
            PayloadFormat::Flat,
            query(&[("token", "secret"), ("status", "ok")]),
            br#"{"status": "ignored"}"#,
        )
        .unwrap();

        assert_eq!(lookup.resolve("status"), Some("ok".to_string()));
        assert_eq!(lookup.resolve("token"), None);
    }
}
