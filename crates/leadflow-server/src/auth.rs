//! API Key Authentication
//!
//! Guards the interactive CRM routes. Accepts the key either as a
//! `Bearer` token or an `x-api-key` header, which is what the cron
//! triggers and the CLI send. The telephony webhook is not behind this
//! middleware; it authenticates with its own HMAC payload signature.

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::OnceLock;

static API_KEY: OnceLock<String> = OnceLock::new();

/// Install the API key from secrets at startup.
pub fn init_api_key(key: String) {
    let _ = API_KEY.set(key);
}

fn configured_key() -> Option<&'static str> {
    API_KEY.get().map(String::as_str).filter(|k| !k.is_empty())
}

/// Pull the presented key out of either supported header.
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(bearer) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        return Some(bearer);
    }
    headers.get("x-api-key").and_then(|h| h.to_str().ok())
}

/// Authentication middleware for the protected route group.
pub async fn auth_middleware(request: Request, next: Next) -> Result<Response, StatusCode> {
    let Some(expected) = configured_key() else {
        // No key configured = auth disabled (for development)
        tracing::warn!("No API key configured, authentication disabled");
        return Ok(next.run(request).await);
    };

    match presented_key(request.headers()) {
        Some(token) if token == expected => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!("Invalid API key attempted");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => {
            tracing::warn!("Missing API key header");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_presented_key_prefers_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer secret-a"),
        );
        headers.insert("x-api-key", HeaderValue::from_static("secret-b"));
        assert_eq!(presented_key(&headers), Some("secret-a"));
    }

    #[test]
    fn test_presented_key_falls_back_to_api_key_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("secret-b"));
        assert_eq!(presented_key(&headers), Some("secret-b"));
    }

    #[test]
    fn test_malformed_authorization_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert_eq!(presented_key(&headers), None);
    }
}
