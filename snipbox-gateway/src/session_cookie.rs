//! Signed session cookie.
//!
//! The cookie value is `<token>.<signature>`, where the signature is the
//! HMAC-SHA256 of the token under the server secret, base64url encoded. A
//! cookie whose signature does not verify is treated as absent.

use axum::http::{header::COOKIE, HeaderMap};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use cookie::{Cookie, SameSite};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use snipbox_core::{session::SESSION_TTL_DAYS, SecretString};

type HmacSha256 = Hmac<Sha256>;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "snipbox_session";

/// Signs, verifies and renders session cookies.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    secret: SecretString,
    secure: bool,
}

impl CookieSettings {
    /// `secure` sets the `Secure` attribute on every cookie issued.
    #[must_use]
    pub fn new(secret: SecretString, secure: bool) -> Self {
        Self { secret, secure }
    }

    // HMAC accepts keys of any length.
    #[allow(clippy::expect_used)]
    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC key of any length is valid")
    }

    /// Returns the cookie value for `token`.
    #[must_use]
    pub fn sign(&self, token: &str) -> String {
        let mut mac = self.mac();
        mac.update(token.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        format!("{token}.{signature}")
    }

    /// Returns the token inside `value` if its signature is valid.
    #[must_use]
    pub fn verify(&self, value: &str) -> Option<String> {
        let (token, signature) = value.rsplit_once('.')?;
        if token.is_empty() {
            return None;
        }
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        let mut mac = self.mac();
        mac.update(token.as_bytes());
        mac.verify_slice(&signature).ok()?;
        Some(token.to_owned())
    }

    /// Cookie that establishes a session for `token`.
    #[must_use]
    pub fn session_cookie(&self, token: &SecretString) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, self.sign(token.expose_secret())))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(cookie::time::Duration::days(SESSION_TTL_DAYS))
            .build()
    }

    /// Cookie that tells the browser to drop the session.
    #[must_use]
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .build();
        cookie.make_removal();
        cookie
    }

    /// Finds the session cookie among the request's `Cookie` headers and
    /// returns its verified token.
    #[must_use]
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<SecretString> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| Cookie::split_parse(value))
            .filter_map(Result::ok)
            .filter(|c| c.name() == SESSION_COOKIE)
            .find_map(|c| self.verify(c.value()))
            .map(SecretString::new)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use proptest::prelude::*;

    use super::*;

    fn settings() -> CookieSettings {
        CookieSettings::new(SecretString::new("k".repeat(32)), false)
    }

    fn headers_with(cookie_header: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(cookie_header) {
            Ok(v) => {
                headers.insert(COOKIE, v);
            }
            Err(e) => panic!("bad header value: {e}"),
        }
        headers
    }

    #[test]
    fn signed_value_verifies() {
        let s = settings();
        let value = s.sign("abc123");
        assert_eq!(s.verify(&value).as_deref(), Some("abc123"));
    }

    #[test]
    fn any_key_length_signs_and_verifies() {
        for key in [String::new(), "k".to_owned(), "k".repeat(200)] {
            let s = CookieSettings::new(SecretString::new(key), false);
            let value = s.sign("abc123");
            assert_eq!(s.verify(&value).as_deref(), Some("abc123"));
        }
    }

    #[test]
    fn tampered_token_is_rejected() {
        let s = settings();
        let value = s.sign("abc123");
        let forged = value.replacen("abc123", "abc124", 1);
        assert_eq!(s.verify(&forged), None);
        assert_eq!(s.verify("abc123"), None);
        assert_eq!(s.verify(".sig"), None);
    }

    #[test]
    fn other_secret_does_not_verify() {
        let value = settings().sign("abc123");
        let other = CookieSettings::new(SecretString::new("z".repeat(32)), false);
        assert_eq!(other.verify(&value), None);
    }

    #[test]
    fn session_cookie_has_expected_attributes() {
        let s = CookieSettings::new(SecretString::new("k".repeat(32)), true);
        let rendered = s.session_cookie(&SecretString::new("tok")).to_string();
        assert!(rendered.starts_with("snipbox_session=tok."), "got: {rendered}");
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("Max-Age=604800"));
    }

    #[test]
    fn development_cookie_is_not_secure() {
        let rendered = settings().session_cookie(&SecretString::new("tok")).to_string();
        assert!(!rendered.contains("Secure"), "got: {rendered}");
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let rendered = settings().removal_cookie().to_string();
        assert!(rendered.starts_with("snipbox_session=;"), "got: {rendered}");
        assert!(rendered.contains("Max-Age=0"));
    }

    #[test]
    fn token_is_found_among_other_cookies() {
        let s = settings();
        let header = format!("theme=dark; {SESSION_COOKIE}={}; lang=en", s.sign("tok-9"));
        let token = s.token_from_headers(&headers_with(&header));
        assert_eq!(token.as_ref().map(SecretString::expose_secret), Some("tok-9"));
    }

    #[test]
    fn unsigned_cookie_is_ignored() {
        let s = settings();
        let header = format!("{SESSION_COOKIE}=tok-9");
        assert!(s.token_from_headers(&headers_with(&header)).is_none());
        assert!(s.token_from_headers(&HeaderMap::new()).is_none());
    }

    proptest! {
        #[test]
        fn verify_never_panics(value in ".*") {
            let _ = settings().verify(&value);
        }

        #[test]
        fn sign_then_verify_returns_token(token in "[A-Za-z0-9_-]{1,64}") {
            let s = settings();
            prop_assert_eq!(s.verify(&s.sign(&token)), Some(token));
        }
    }
}
