use std::sync::LazyLock;

use axum::http::{HeaderMap, header::COOKIE};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use regex::Regex;
use serde::{Deserialize, Deserializer};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("email pattern")
});

/// Trimmed, lowercased email, or `None` when it does not look like an address.
pub fn sanitize_email(input: &str) -> Option<String> {
    let email = input.trim().to_lowercase();

    EMAIL.is_match(&email).then_some(email)
}

/// `n` random bytes as URL-safe base64 without padding.
pub fn random_token(n: usize) -> String {
    let mut bytes = vec![0u8; n];
    rand::rng().fill_bytes(&mut bytes);

    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Tells a missing field (`None`) apart from an explicit `null` (`Some(None)`).
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_sanitize_email() {
        assert_eq!(
            sanitize_email("  Alice@Example.COM "),
            Some("alice@example.com".to_string())
        );
        assert_eq!(
            sanitize_email("first.last+coffee@mail.co.uk"),
            Some("first.last+coffee@mail.co.uk".to_string())
        );
    }

    #[rstest]
    #[case("")]
    #[case("no-at-sign")]
    #[case("a@b")]
    #[case("two@@example.com")]
    #[case("space in@example.com")]
    fn test_reject_email(#[case] input: &str) {
        assert_eq!(sanitize_email(input), None);
    }

    #[test]
    fn test_random_token() {
        let token = random_token(32);

        assert_eq!(token.len(), 43);
        assert!(!token.contains(['+', '/', '=']));
        assert_ne!(token, random_token(32));
    }

    #[test]
    fn test_get_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; access_token=abc.def; other=1"),
        );

        assert_eq!(get_cookie(&headers, "access_token"), Some("abc.def".to_string()));
        assert_eq!(get_cookie(&headers, "theme"), Some("dark".to_string()));
        assert_eq!(get_cookie(&headers, "missing"), None);
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        notes: Option<Option<String>>,
    }

    #[test]
    fn test_double_option() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"notes": "hot"}"#).unwrap();

        assert_eq!(missing.notes, None);
        assert_eq!(null.notes, Some(None));
        assert_eq!(set.notes, Some(Some("hot".to_string())));
    }
}
