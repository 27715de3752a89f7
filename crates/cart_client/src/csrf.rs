//! CSRF token lookup from cookie storage.

use std::sync::{Arc, RwLock};

use reqwest::cookie::{CookieStore, Jar};
use url::Url;

pub const CSRF_COOKIE_NAME: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Value of the `csrftoken` cookie in a `name=value; name=value` cookie
/// string, or an empty string when the cookie is not present.
pub fn extract_csrf_token(cookies: &str) -> String {
    let prefix = format!("{CSRF_COOKIE_NAME}=");
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .unwrap_or_default()
        .to_string()
}

/// Cookie storage the client reads on every request. Tokens are never cached.
pub trait CsrfTokenSource: Send + Sync {
    fn cookie_string(&self) -> String;

    fn csrf_token(&self) -> String {
        extract_csrf_token(&self.cookie_string())
    }
}

/// A mutable cookie string, the way a page exposes `document.cookie`.
#[derive(Debug, Clone, Default)]
pub struct CookieString {
    inner: Arc<RwLock<String>>,
}

impl CookieString {
    pub fn new(cookies: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cookies.into())),
        }
    }

    pub fn set(&self, cookies: impl Into<String>) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = cookies.into();
    }
}

impl CsrfTokenSource for CookieString {
    fn cookie_string(&self) -> String {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Reads cookies the HTTP client's jar would send to `url`.
#[derive(Debug, Clone)]
pub struct JarTokenSource {
    jar: Arc<Jar>,
    url: Url,
}

impl JarTokenSource {
    pub fn new(jar: Arc<Jar>, url: Url) -> Self {
        Self { jar, url }
    }
}

impl CsrfTokenSource for JarTokenSource {
    fn cookie_string(&self) -> String {
        self.jar
            .cookies(&self.url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "tests/csrf_tests.rs"]
mod tests;
