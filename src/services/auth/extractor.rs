//! `Authorization: Bearer <token>` extraction.

use axum::http::{HeaderMap, header};

const BEARER_PREFIX: &str = "Bearer ";

/// Returns the raw token after the exact, case-sensitive `"Bearer "` prefix.
///
/// The token is returned untouched (no trimming, no decoding). A missing
/// header, a non-UTF-8/visible-ASCII value or any other scheme yields `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn extracts_token_after_prefix() {
        let h = headers("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&h), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_header_is_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn other_scheme_is_none() {
        assert_eq!(bearer_token(&headers("Token abc123")), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
    }

    #[test]
    fn prefix_is_case_sensitive_and_exact() {
        assert_eq!(bearer_token(&headers("bearer abc")), None);
        assert_eq!(bearer_token(&headers("BEARER abc")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Bearerabc")), None);
    }

    #[test]
    fn token_is_not_trimmed() {
        assert_eq!(bearer_token(&headers("Bearer  abc ")), Some(" abc "));
        assert_eq!(bearer_token(&headers("Bearer ")), Some(""));
    }
}
