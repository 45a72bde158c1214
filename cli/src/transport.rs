//! Execute descriptors with `ureq`.
//!
//! # Design
//! The core only describes requests and client settings; this module is the
//! host that performs the I/O. `agent` maps a `ClientConfig` onto a ureq
//! `Agent` and `execute` runs one `HttpRequest` through it.
//!
//! Redirect handling relies on `max_redirects_will_error(false)`: when the
//! policy stops following, ureq hands back the redirect response itself
//! instead of failing, which is what curl does. Status codes are never
//! turned into errors here; `--fail` is decided by the caller.

use curlflags_core::{ClientConfig, HttpRequest, RedirectPolicy};
use tracing::debug;
use ureq::tls::TlsConfig;
use ureq::{Agent, Proxy};

/// Errors from building the agent or executing a request.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The descriptor could not be turned into an `http::Request`.
    #[error(transparent)]
    Request(#[from] curlflags_core::Error),

    /// Connection, TLS, timeout, proxy or protocol failure.
    #[error(transparent)]
    Http(#[from] ureq::Error),
}

/// A response read to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// `HTTP/1.1`, `HTTP/2.0`, ...
    pub version: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// Status line as curl prints it with `--include`.
    pub fn status_line(&self) -> String {
        let reason = http::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("");
        format!("{} {} {}", self.version, self.status, reason)
            .trim_end()
            .to_string()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Build a ureq agent that enforces `config`.
pub fn agent(config: &ClientConfig) -> Result<Agent, TransportError> {
    let mut builder = Agent::config_builder()
        .http_status_as_error(false)
        .max_redirects_will_error(false)
        .timeout_connect(config.connect_timeout)
        .timeout_global(config.timeout);

    if let Some(max) = max_redirects(config.redirect) {
        builder = builder.max_redirects(max);
    }

    if !config.verify_tls {
        builder = builder.tls_config(TlsConfig::builder().disable_verification(true).build());
    }

    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(Some(Proxy::new(proxy.as_str())?));
    }

    Ok(builder.build().new_agent())
}

/// Redirects ureq may follow under `policy`; `None` keeps ureq's own cap.
///
/// `Limited(n)` counts the initial request, ureq counts only redirects.
fn max_redirects(policy: RedirectPolicy) -> Option<u32> {
    match policy {
        RedirectPolicy::None => Some(0),
        RedirectPolicy::Follow => None,
        RedirectPolicy::Limited(max) => Some(max.saturating_sub(1)),
    }
}

/// Send `request` through `agent` and read the whole response.
pub fn execute(agent: &Agent, request: &HttpRequest) -> Result<Response, TransportError> {
    let http_request = request.to_http()?;
    debug!(method = %request.method, url = %request.url, "sending request");

    let mut response = agent.run(http_request)?;
    let status = response.status().as_u16();
    let version = format!("{:?}", response.version());
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = response.body_mut().read_to_vec()?;

    debug!(status, bytes = body.len(), "received response");
    Ok(Response {
        status,
        version,
        headers,
        body,
    })
}
