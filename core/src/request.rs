//! Request assembly from curl-style options.
//!
//! # Design
//! `build_request` is a pure function of the option snapshot and the
//! positional arguments. It resolves method and URL, picks at most one body
//! source, optionally folds that body into the query string (`--get`), and
//! then applies header, auth and cookie flags. Malformed header, cookie and
//! credential entries are skipped; only a missing method/URL or an invalid
//! URL fails the build.

use tracing::debug;

use crate::body;
use crate::error::Error;
use crate::http::{Cookie, Headers, HttpRequest};
use crate::options::OptionSource;
use crate::parse;

/// Value sent for `--compressed`.
pub const ACCEPT_ENCODING_COMPRESSED: &str = "gzip, deflate, br";

/// Build an `HttpRequest` from an option snapshot.
///
/// `args` are the positional command-line arguments; the first one is used
/// as the URL when `url` is not set.
pub fn build_request<O, S>(options: &O, args: &[S]) -> Result<HttpRequest, Error>
where
    O: OptionSource,
    S: AsRef<str>,
{
    let method = resolve_method(options);
    let url = resolve_url(options, args);
    let (Some(method), Some(mut url)) = (method, url) else {
        return Err(Error::MissingRequiredFields);
    };

    url::Url::parse(&url).map_err(|source| Error::InvalidUrl {
        url: url.clone(),
        source,
    })?;

    let resolved = body::resolve(options);
    let (mut body, mut synthetic) = match resolved {
        Some(resolved) => {
            debug!(source = resolved.source, "resolved request body");
            (resolved.body, resolved.headers)
        }
        None => (Vec::new(), Vec::new()),
    };

    if options.is_set("get") && !body.is_empty() {
        let separator = if url.contains('?') { '&' } else { '?' };
        url.push(separator);
        url.push_str(&String::from_utf8_lossy(&body));
        body.clear();
        synthetic.clear();
    }

    let mut request = HttpRequest {
        method: method.to_uppercase(),
        url,
        headers: Headers::new(),
        cookies: Vec::new(),
        body,
    };

    if options.is_set("compressed") {
        request.headers.set("Accept-Encoding", ACCEPT_ENCODING_COMPRESSED);
    }
    if let Some(range) = options.non_empty("range") {
        request.headers.set("Range", &format!("bytes={range}"));
    }
    if let Some(agent) = options.non_empty("user-agent") {
        request.headers.set("User-Agent", agent);
    }
    if let Some(user) = options.non_empty("user") {
        match parse::split_credentials(user) {
            Some((name, pass)) => request.set_basic_auth(name, pass),
            None => debug!("ignoring --user without a colon"),
        }
    }
    if let Some(token) = options.non_empty("oauth2-bearer") {
        request.headers.set("Authorization", &format!("Bearer {token}"));
    }
    if let Some(referer) = options.non_empty("referer") {
        request.headers.set("Referer", referer);
    }

    for (name, value) in synthetic {
        request.headers.add(name, value);
    }
    for raw in options.strings("header").unwrap_or_default() {
        if raw.is_empty() {
            continue;
        }
        match parse::split_header(&raw) {
            Some((name, value)) => request.headers.add(name, value),
            None => debug!(header = %raw, "skipping malformed header"),
        }
    }

    for raw in options.strings("cookie").unwrap_or_default() {
        request.cookies.extend(
            parse::cookie_pairs(&raw).map(|(name, value)| Cookie::new(name, value)),
        );
    }

    Ok(request)
}

/// `request` wins, then `get`, then `head`.
fn resolve_method(options: &impl OptionSource) -> Option<String> {
    if let Some(method) = options.non_empty("request") {
        return Some(method.to_string());
    }
    if options.is_set("get") {
        return Some("GET".to_string());
    }
    if options.is_set("head") {
        return Some("HEAD".to_string());
    }
    None
}

fn resolve_url<S: AsRef<str>>(options: &impl OptionSource, args: &[S]) -> Option<String> {
    options
        .non_empty("url")
        .or_else(|| args.first().map(S::as_ref).filter(|s| !s.is_empty()))
        .map(str::to_string)
}
