//! Error types for request and client assembly.
//!
//! # Design
//! `MissingRequiredFields` gets a dedicated, stable message because calling
//! tools match on it to print usage guidance. URL and proxy failures carry
//! the offending input plus the underlying `url::ParseError`. Malformed
//! headers, cookies and credentials never produce an error; the builders
//! skip them.

/// Errors returned by `build_request`, `build_client` and
/// `HttpRequest::to_http`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither a method nor a URL could be resolved from the options.
    #[error("missing required fields: method and url")]
    MissingRequiredFields,

    /// The target URL is not a structurally valid absolute URL.
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The proxy URL could not be parsed.
    #[error("invalid proxy url {proxy:?}: {source}")]
    InvalidProxy {
        proxy: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL parsed as a `url::Url` but not as an `http::Uri`.
    #[error("invalid request uri {url:?}: {source}")]
    InvalidUri {
        url: String,
        #[source]
        source: http::uri::InvalidUri,
    },

    /// A header name or value cannot be represented on the wire.
    #[error("invalid header {name:?}")]
    InvalidHeader { name: String },

    /// The method is not a valid HTTP token.
    #[error("invalid method {0:?}")]
    InvalidMethod(String),
}
