//! Client configuration from curl-style options.
//!
//! # Design
//! `ClientConfig` holds only declarative data: TLS verification, timeouts,
//! proxy and redirect policy. It opens no connections and enforces nothing;
//! the execution layer (host) maps it onto whatever HTTP client it runs.
//!
//! Redirects are not followed unless `location` is set, matching curl
//! rather than typical HTTP client defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::options::OptionSource;

/// How redirect responses are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectPolicy {
    /// Hand the first redirect response back to the caller.
    #[default]
    None,
    /// Follow every redirect, subject to the transport's own safety cap.
    Follow,
    /// Cap on requests in the chain, the initial one included: `Limited(3)`
    /// follows two redirects and returns the third redirect response.
    Limited(u32),
}

/// Decision for a single redirect hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectAction {
    Follow,
    UseLastResponse,
}

impl RedirectPolicy {
    /// Decide the next hop given how many requests were already made,
    /// counting the initial request. The first redirect sees `1`.
    pub fn check(&self, requests: u32) -> RedirectAction {
        match self {
            RedirectPolicy::None => RedirectAction::UseLastResponse,
            RedirectPolicy::Follow => RedirectAction::Follow,
            RedirectPolicy::Limited(max) if requests < *max => RedirectAction::Follow,
            RedirectPolicy::Limited(_) => RedirectAction::UseLastResponse,
        }
    }
}

/// HTTP client settings derived from the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// `false` only with `--insecure`.
    pub verify_tls: bool,
    /// Bound on connection establishment.
    pub connect_timeout: Option<Duration>,
    /// Bound on the whole request, connect plus transfer.
    pub timeout: Option<Duration>,
    pub proxy: Option<Url>,
    pub redirect: RedirectPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            verify_tls: true,
            connect_timeout: None,
            timeout: None,
            proxy: None,
            redirect: RedirectPolicy::None,
        }
    }
}

/// Build a `ClientConfig` from an option snapshot.
///
/// The only failure is a proxy URL that does not parse.
pub fn build_client<O: OptionSource>(options: &O) -> Result<ClientConfig, Error> {
    let mut config = ClientConfig {
        verify_tls: !options.is_set("insecure"),
        connect_timeout: options.float("connect-timeout").and_then(seconds),
        timeout: options.float("max-time").and_then(seconds),
        ..ClientConfig::default()
    };

    if let Some(proxy) = options.non_empty("proxy") {
        config.proxy = Some(parse_proxy(proxy)?);
    }

    if options.is_set("location") {
        config.redirect = match options.int("max-redirs") {
            Some(max) if max > 0 => RedirectPolicy::Limited(u32::try_from(max).unwrap_or(u32::MAX)),
            _ => RedirectPolicy::Follow,
        };
    }

    debug!(?config, "built client config");
    Ok(config)
}

/// Positive, finite seconds as a `Duration`; anything else means "unset".
fn seconds(secs: f64) -> Option<Duration> {
    if secs.is_nan() || secs <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs).ok()
}

/// Parse a proxy URL, assuming `http://` when no scheme is given.
fn parse_proxy(raw: &str) -> Result<Url, Error> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    Url::parse(&candidate).map_err(|source| Error::InvalidProxy {
        proxy: raw.to_string(),
        source,
    })
}
