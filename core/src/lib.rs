//! Curl-style option assembly for HTTP requests and clients.
//!
//! # Overview
//! Turns a snapshot of curl flag values (`--request`, `--data`, `-H`,
//! `--location`, ...) into an `HttpRequest` descriptor and a `ClientConfig`
//! without touching the network (host-does-IO pattern). The caller executes
//! the request with the HTTP client of its choice.
//!
//! # Design
//! - Both builders are pure functions of an `OptionSource` snapshot; calling
//!   them twice with the same options yields equal values.
//! - `build_request` and `build_client` are independent; neither calls the
//!   other.
//! - Body sources are resolved through one ordered resolver table in `body`.
//! - Composite string flags (`Name: Value`, `user:pass`, `a=b; c=d`) are
//!   parsed by the total functions in `parse`.
//!
//! ```
//! use curlflags_core::{build_client, build_request, Options, RedirectPolicy};
//!
//! let opts = Options::new()
//!     .with("request", "POST")
//!     .with("url", "http://localhost:3000/echo")
//!     .with("json", r#"{"name":"curlflags"}"#);
//! let req = build_request(&opts, &[] as &[&str]).unwrap();
//! assert_eq!(req.headers.get("Content-Type"), Some("application/json"));
//!
//! let client = build_client(&opts).unwrap();
//! assert_eq!(client.redirect, RedirectPolicy::None);
//! ```

pub mod body;
pub mod client;
pub mod error;
pub mod http;
pub mod options;
pub mod parse;
pub mod request;

pub use client::{build_client, ClientConfig, RedirectAction, RedirectPolicy};
pub use error::Error;
pub use http::{Cookie, Headers, HttpRequest};
pub use options::{OptionSource, OptionValue, Options};
pub use request::build_request;
