//! HTTP server that reports back what it received.
//!
//! `/echo` answers every method with a JSON `Captured` record of the
//! request. `/redirect/{n}` serves a chain of `n + 1` redirects ending at
//! `/echo`, `/status/{code}` answers with an arbitrary status and
//! `/slow/{ms}` delays its response.

use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// A request as seen by the server.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Every header line in arrival order, names lowercased.
    pub headers: Vec<(String, String)>,
    pub cookies: BTreeMap<String, String>,
    pub body: String,
}

impl Captured {
    /// Every value of the named header.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name).into_iter().next()
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/redirect/{hops}", get(redirect))
        .route("/status/{code}", get(status))
        .route("/slow/{ms}", get(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Captured> {
    let mut captured = Captured {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body: String::from_utf8_lossy(&body).into_owned(),
        ..Captured::default()
    };
    for (name, value) in &headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        captured.headers.push((name.to_string(), value));
    }
    for cookie in headers.get_all(header::COOKIE) {
        let Ok(cookie) = cookie.to_str() else { continue };
        for pair in cookie.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                captured.cookies.insert(name.to_string(), value.to_string());
            }
        }
    }
    Json(captured)
}

async fn redirect(Path(hops): Path<u32>) -> impl IntoResponse {
    let location = match hops {
        0 => "/echo".to_string(),
        n => format!("/redirect/{}", n - 1),
    };
    (StatusCode::FOUND, [(header::LOCATION, location)])
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn slow(Path(ms): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    "done"
}
