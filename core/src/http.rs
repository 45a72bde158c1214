//! HTTP request descriptor built from curl-style options.
//!
//! # Design
//! `HttpRequest` describes a request as plain data. The core builds it
//! without touching the network; the caller (host) executes it with whatever
//! HTTP client it likes, either field by field or through `to_http`, which
//! produces an `http::Request` for clients built on the `http` crate.
//!
//! All fields use owned types so a descriptor can be cloned, compared and
//! handed across threads freely.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::Error;

/// Ordered header multimap.
///
/// `add` appends, `set` replaces every value stored under the same name.
/// Names compare case-insensitively but keep the spelling they were added
/// with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, value: &str) {
        self.entries.push((name.to_string(), value.to_string()));
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.remove(name);
        self.add(name, value);
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    /// First value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Every value stored under `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single request cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// An outbound HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Uppercased method token.
    pub method: String,
    /// Target URL exactly as resolved, including any folded query data.
    pub url: String,
    pub headers: Headers,
    pub cookies: Vec<Cookie>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Set HTTP Basic authentication, replacing any `Authorization` header.
    pub fn set_basic_auth(&mut self, user: &str, pass: &str) {
        let token = STANDARD.encode(format!("{user}:{pass}"));
        self.headers.set("Authorization", &format!("Basic {token}"));
    }

    /// Cookies joined into a single `Cookie` header value, if any.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect();
        Some(pairs.join("; "))
    }

    /// Body as UTF-8 text, lossily.
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Convert into an `http::Request`.
    ///
    /// Cookies are folded into one `Cookie` header after the explicit
    /// headers. Fails when the method, URL or a header cannot be represented
    /// by the `http` crate.
    pub fn to_http(&self) -> Result<http::Request<Vec<u8>>, Error> {
        let method = http::Method::from_bytes(self.method.as_bytes())
            .map_err(|_| Error::InvalidMethod(self.method.clone()))?;
        let uri: http::Uri = self.url.parse().map_err(|source| Error::InvalidUri {
            url: self.url.clone(),
            source,
        })?;

        let mut request = http::Request::new(self.body.clone());
        *request.method_mut() = method;
        *request.uri_mut() = uri;

        let headers = request.headers_mut();
        for (name, value) in self.headers.iter() {
            let invalid = || Error::InvalidHeader {
                name: name.to_string(),
            };
            let name = http::HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let value = http::HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.append(name, value);
        }
        if let Some(cookie) = self.cookie_header() {
            let value = http::HeaderValue::from_str(&cookie).map_err(|_| Error::InvalidHeader {
                name: "Cookie".to_string(),
            })?;
            headers.append(http::header::COOKIE, value);
        }

        Ok(request)
    }
}
