//! End-to-end checks against the live echo server.
//!
//! # Design
//! Starts the echo server on a random port, parses curl-style arguments with
//! the real flag registry, builds the request and client with the core, and
//! executes them with the ureq agent. The server reports what arrived on the
//! wire, so each test asserts on the request as the server saw it.

use std::net::SocketAddr;
use std::time::Duration;

use curlflags_cli::{command, transport, CurlDefaults, MatchesSource, Response};
use curlflags_core::{build_client, build_request};
use echo_server::Captured;

/// Start the echo server on a background thread and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            echo_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

/// Run curl-style `args` through registry, builders and transport.
fn fetch(args: &[&str]) -> Response {
    let matches = command()
        .try_get_matches_from(std::iter::once("curlflags").chain(args.iter().copied()))
        .expect("arguments should parse");
    let source = MatchesSource::new(&matches);
    let options = CurlDefaults::new(source);

    let positionals = source.positionals();
    let request = build_request(&options, positionals.as_slice()).expect("request should build");
    let client = build_client(&options).expect("client should build");
    let agent = transport::agent(&client).expect("agent should build");
    transport::execute(&agent, &request).expect("HTTP transport error")
}

/// Like `fetch`, decoding the echo server's report.
fn send(args: &[&str]) -> Captured {
    let response = fetch(args);
    assert_eq!(response.status, 200, "unexpected status");
    serde_json::from_slice(&response.body).unwrap()
}

#[test]
fn get_by_default() {
    let addr = start_server();
    let captured = send(&[&format!("http://{addr}/echo")]);
    assert_eq!(captured.method, "GET");
    assert!(captured.body.is_empty());
}

#[test]
fn data_implies_post() {
    let addr = start_server();
    let captured = send(&["-d", "key=value", &format!("http://{addr}/echo")]);
    assert_eq!(captured.method, "POST");
    assert_eq!(captured.body, "key=value");
}

#[test]
fn explicit_method_and_url_flag() {
    let addr = start_server();
    let url = format!("http://{addr}/echo");
    let captured = send(&["-X", "put", "--url", &url, "--data-raw", "@raw"]);
    assert_eq!(captured.method, "PUT");
    assert_eq!(captured.body, "@raw");
}

#[test]
fn head_returns_no_body() {
    let addr = start_server();
    let response = fetch(&["-I", &format!("http://{addr}/echo")]);
    assert_eq!(response.status, 200);
    assert!(response.body.is_empty());
}

#[test]
fn get_moves_data_into_query() {
    let addr = start_server();
    let url = format!("http://{addr}/echo?existing=1");
    let captured = send(&["-G", "-d", "key=value", &url]);
    assert_eq!(captured.method, "GET");
    assert_eq!(captured.query.as_deref(), Some("existing=1&key=value"));
    assert!(captured.body.is_empty());
}

#[test]
fn urlencoded_data_arrives_encoded() {
    let addr = start_server();
    let captured = send(&["--data-urlencode", "q=hello world", &format!("http://{addr}/echo")]);
    assert_eq!(captured.body, "q=hello+world");
}

#[test]
fn form_fields_and_content_type() {
    let addr = start_server();
    let url = format!("http://{addr}/echo");
    let captured = send(&["-F", "field=hello", "-F", "other=world", &url]);
    assert_eq!(captured.method, "POST");
    assert_eq!(
        captured.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    let mut pairs: Vec<_> = captured.body.split('&').collect();
    pairs.sort_unstable();
    assert_eq!(pairs, vec!["field=hello", "other=world"]);
}

#[test]
fn json_sets_both_headers() {
    let addr = start_server();
    let captured = send(&["--json", r#"{"key":"value"}"#, &format!("http://{addr}/echo")]);
    assert_eq!(captured.body, r#"{"key":"value"}"#);
    assert_eq!(captured.header("content-type"), Some("application/json"));
    assert_eq!(captured.header("accept"), Some("application/json"));
}

#[test]
fn custom_headers_and_duplicates() {
    let addr = start_server();
    let url = format!("http://{addr}/echo");
    let captured = send(&[
        "-H",
        "X-Custom: one",
        "-H",
        "X-Custom: two",
        "-H",
        "NoColon",
        "-A",
        "curlflags-test/1.0",
        "-e",
        "http://referrer.example",
        "-r",
        "0-99",
        &url,
    ]);
    assert_eq!(captured.header_values("x-custom"), vec!["one", "two"]);
    assert_eq!(captured.header("user-agent"), Some("curlflags-test/1.0"));
    assert_eq!(captured.header("referer"), Some("http://referrer.example"));
    assert_eq!(captured.header("range"), Some("bytes=0-99"));
    assert_eq!(captured.header("nocolon"), None);
}

#[test]
fn basic_auth_and_bearer() {
    let addr = start_server();
    let url = format!("http://{addr}/echo");

    let captured = send(&["-u", "alice:secret", &url]);
    assert_eq!(captured.header("authorization"), Some("Basic YWxpY2U6c2VjcmV0"));

    let captured = send(&["--oauth2-bearer", "token123", &url]);
    assert_eq!(captured.header("authorization"), Some("Bearer token123"));
}

#[test]
fn cookies_arrive_as_one_header() {
    let addr = start_server();
    let url = format!("http://{addr}/echo");
    let captured = send(&["-b", "session=abc123; user=admin", "-b", "theme=dark", &url]);
    assert_eq!(captured.cookies.len(), 3);
    assert_eq!(captured.cookies["session"], "abc123");
    assert_eq!(captured.cookies["user"], "admin");
    assert_eq!(captured.cookies["theme"], "dark");
}

#[test]
fn redirects_are_not_followed_by_default() {
    let addr = start_server();
    let response = fetch(&[&format!("http://{addr}/redirect/1")]);
    assert_eq!(response.status, 302);
    assert_eq!(response.header("location"), Some("/redirect/0"));
}

#[test]
fn location_follows_the_whole_chain() {
    let addr = start_server();
    let response = fetch(&["-L", &format!("http://{addr}/redirect/2")]);
    assert_eq!(response.status, 200);
    let captured: Captured = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(captured.path, "/echo");
}

#[test]
fn max_redirs_stops_and_returns_last_response() {
    let addr = start_server();
    // /redirect/3 -> /redirect/2 -> /redirect/1, whose response is the third
    let response = fetch(&["-L", "--max-redirs", "3", &format!("http://{addr}/redirect/3")]);
    assert_eq!(response.status, 302);
    assert_eq!(response.header("location"), Some("/redirect/0"));
}

#[test]
fn max_redirs_one_follows_nothing() {
    let addr = start_server();
    let response = fetch(&["-L", "--max-redirs", "1", &format!("http://{addr}/redirect/3")]);
    assert_eq!(response.status, 302);
    assert_eq!(response.header("location"), Some("/redirect/2"));
}

#[test]
fn max_time_bounds_the_request() {
    let addr = start_server();
    let url = format!("http://{addr}/slow/2000");
    let matches = command()
        .try_get_matches_from(["curlflags", "-m", "0.2", url.as_str()])
        .unwrap();
    let source = MatchesSource::new(&matches);
    let options = CurlDefaults::new(source);
    let positionals = source.positionals();
    let request = build_request(&options, positionals.as_slice()).unwrap();
    let client = build_client(&options).unwrap();
    assert_eq!(client.timeout, Some(Duration::from_millis(200)));

    let agent = transport::agent(&client).unwrap();
    let err = transport::execute(&agent, &request).unwrap_err();
    let err = curlflags_cli::CliError::from(err);
    assert_eq!(err.exit_code(), 28, "{err}");
}

#[test]
fn error_statuses_are_returned_as_responses() {
    let addr = start_server();
    let response = fetch(&[&format!("http://{addr}/status/404")]);
    assert_eq!(response.status, 404);
}
