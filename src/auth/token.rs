use std::collections::HashMap;

use axum::http::{header, HeaderMap};

use crate::endpoints::WebhookConfig;
use crate::error::AppError;

/// Query parameter carrying the shared-secret token
pub const TOKEN_PARAM: &str = "token";

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Token from the `token` query parameter, falling back to the bearer header
pub fn extract_token<'a>(
    query: &'a HashMap<String, String>,
    headers: &'a HeaderMap,
) -> Option<&'a str> {
    query
        .get(TOKEN_PARAM)
        .map(String::as_str)
        .or_else(|| extract_bearer_token(headers))
}

/// Check a request token against the token list of one configuration snapshot
pub fn authorize(config: &WebhookConfig, token: Option<&str>) -> Result<(), AppError> {
    match token {
        Some(token) if config.is_valid_token(token) => Ok(()),
        Some(_) => Err(AppError::Forbidden("Invalid token".to_string())),
        None => Err(AppError::Forbidden("Missing token".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::EndpointRegistry;
    use axum::http::HeaderValue;

    fn config(tokens: &[&str]) -> WebhookConfig {
        WebhookConfig {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_from_query() {
        let mut query = HashMap::new();
        query.insert("token".to_string(), "from-query".to_string());
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );

        assert_eq!(extract_token(&query, &headers), Some("from-query"));
    }

    #[test]
    fn test_extract_from_header() {
        let query = HashMap::new();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );

        assert_eq!(extract_token(&query, &headers), Some("from-header"));
    }

    #[test]
    fn test_extract_ignores_other_schemes() {
        let query = HashMap::new();
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));

        assert_eq!(extract_token(&query, &headers), None);
    }

    #[test]
    fn test_authorize() {
        let config = config(&["secret"]);

        assert!(authorize(&config, Some("secret")).is_ok());
        assert!(matches!(
            authorize(&config, Some("nope")),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            authorize(&config, None),
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_authorize_uses_one_snapshot() {
        let registry = EndpointRegistry::new(config(&["secret"]));
        let snapshot = registry.snapshot().await;

        registry.replace(config(&["rotated"])).await.unwrap();

        // A request admitted against the old snapshot keeps its token list
        assert!(authorize(&snapshot, Some("secret")).is_ok());
        assert!(authorize(&snapshot, Some("rotated")).is_err());

        let current = registry.snapshot().await;
        assert!(authorize(&current, Some("rotated")).is_ok());
        assert!(authorize(&current, Some("secret")).is_err());
    }
}
