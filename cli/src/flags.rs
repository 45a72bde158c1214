//! Curl flag registry on top of `clap`.
//!
//! # Design
//! `register_flags` declares every flag the builders understand with the
//! value type the builders read: booleans are `SetTrue`, `-H` and `-b`
//! append to lists, `-F key=value` entries collect into a mapping and the
//! timeouts parse as `f64`. `MatchesSource` then exposes the parsed
//! `ArgMatches` through `OptionSource`, using the non-panicking `try_get_*`
//! lookups so an unknown or mistyped id simply reads as absent.
//!
//! `--data-binary` is kept as an `OsString` so payloads that are not valid
//! UTF-8 reach the body unchanged through `OptionSource::bytes`.

use std::ffi::OsString;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use curlflags_core::{body, OptionSource};
use indexmap::IndexMap;

/// Id of the positional URL argument.
pub const URL_ARG: &str = "URL";

/// Declare the curl flags on `cmd`.
pub fn register_flags(cmd: Command) -> Command {
    cmd.arg(string("request", Some('X'), "METHOD", "Specify request method to use"))
        .arg(string("url", None, "URL", "URL to work with"))
        .arg(switch("get", Some('G'), "Put the post data in the URL and use GET"))
        .arg(switch("head", Some('I'), "Show document info only"))
        .arg(string("data", Some('d'), "DATA", "HTTP POST data"))
        .arg(
            Arg::new("data-binary")
                .long("data-binary")
                .value_name("DATA")
                .help("HTTP POST binary data")
                .value_parser(value_parser!(OsString)),
        )
        .arg(string("data-raw", None, "DATA", "HTTP POST data, '@' allowed"))
        .arg(string("data-urlencode", None, "DATA", "HTTP POST data URL encoded"))
        .arg(
            Arg::new("form")
                .short('F')
                .long("form")
                .value_name("NAME=VALUE")
                .help("Specify form field (repeatable)")
                .action(ArgAction::Append)
                .value_parser(parse_form_field),
        )
        .arg(string("json", None, "DATA", "HTTP POST JSON"))
        .arg(switch("compressed", None, "Request compressed response"))
        .arg(string("range", Some('r'), "RANGE", "Retrieve only the bytes within RANGE"))
        .arg(string("user-agent", Some('A'), "NAME", "Send User-Agent <name> to server"))
        .arg(string("user", Some('u'), "USER:PASSWORD", "Server user and password"))
        .arg(string("oauth2-bearer", None, "TOKEN", "OAuth 2 Bearer Token"))
        .arg(string("referer", Some('e'), "URL", "Referrer URL"))
        .arg(list("header", Some('H'), "HEADER", "Pass custom header(s) to server"))
        .arg(list("cookie", Some('b'), "DATA", "Send cookies from string"))
        .arg(switch("insecure", Some('k'), "Allow insecure server connections"))
        .arg(
            Arg::new("connect-timeout")
                .long("connect-timeout")
                .value_name("SECONDS")
                .help("Maximum time allowed for connection")
                .value_parser(value_parser!(f64)),
        )
        .arg(string("proxy", Some('x'), "[PROTOCOL://]HOST[:PORT]", "Use this proxy"))
        .arg(
            Arg::new("max-time")
                .short('m')
                .long("max-time")
                .value_name("SECONDS")
                .help("Maximum time allowed for transfer")
                .value_parser(value_parser!(f64)),
        )
        .arg(switch("location", Some('L'), "Follow redirects"))
        .arg(
            Arg::new("max-redirs")
                .long("max-redirs")
                .value_name("NUM")
                .help("Maximum number of redirects allowed")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64)),
        )
        .arg(switch("include", Some('i'), "Include protocol response headers in the output"))
        .arg(string("output", Some('o'), "FILE", "Write to file instead of stdout"))
        .arg(string(
            "remote-name",
            Some('O'),
            "FILE",
            "Write output to a file named as the remote file",
        ))
        .arg(string("upload-file", Some('T'), "FILE", "Transfer local FILE to destination"))
        .arg(switch("silent", Some('s'), "Silent mode"))
        .arg(switch("verbose", Some('v'), "Make the operation more talkative"))
        .arg(switch("fail", Some('f'), "Fail fast with no output on HTTP errors"))
        .arg(Arg::new(URL_ARG).value_name("URL").help("URL to work with").index(1))
}

fn string(
    id: &'static str,
    short: Option<char>,
    value_name: &'static str,
    help: &'static str,
) -> Arg {
    let arg = Arg::new(id).long(id).value_name(value_name).help(help);
    match short {
        Some(c) => arg.short(c),
        None => arg,
    }
}

fn list(
    id: &'static str,
    short: Option<char>,
    value_name: &'static str,
    help: &'static str,
) -> Arg {
    string(id, short, value_name, help).action(ArgAction::Append)
}

fn switch(id: &'static str, short: Option<char>, help: &'static str) -> Arg {
    let arg = Arg::new(id).long(id).help(help).action(ArgAction::SetTrue);
    match short {
        Some(c) => arg.short(c),
        None => arg,
    }
}

/// Parse one `-F name=value` entry.
fn parse_form_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw:?}"))
}

/// `OptionSource` over parsed command-line arguments.
#[derive(Debug, Clone, Copy)]
pub struct MatchesSource<'a> {
    matches: &'a ArgMatches,
}

impl<'a> MatchesSource<'a> {
    pub fn new(matches: &'a ArgMatches) -> Self {
        Self { matches }
    }

    /// Positional arguments in command-line order.
    pub fn positionals(&self) -> Vec<String> {
        self.strings(URL_ARG).unwrap_or_default()
    }
}

impl OptionSource for MatchesSource<'_> {
    fn string(&self, name: &str) -> Option<&str> {
        self.matches
            .try_get_one::<String>(name)
            .ok()
            .flatten()
            .map(String::as_str)
    }

    fn flag(&self, name: &str) -> Option<bool> {
        self.matches.try_get_one::<bool>(name).ok().flatten().copied()
    }

    fn float(&self, name: &str) -> Option<f64> {
        self.matches.try_get_one::<f64>(name).ok().flatten().copied()
    }

    fn int(&self, name: &str) -> Option<i64> {
        self.matches.try_get_one::<i64>(name).ok().flatten().copied()
    }

    fn strings(&self, name: &str) -> Option<Vec<String>> {
        self.matches
            .try_get_many::<String>(name)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
    }

    fn mapping(&self, name: &str) -> Option<IndexMap<String, String>> {
        self.matches
            .try_get_many::<(String, String)>(name)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
    }

    fn bytes(&self, name: &str) -> Option<Vec<u8>> {
        match self.matches.try_get_one::<OsString>(name) {
            Ok(value) => value.map(|v| v.as_encoded_bytes().to_vec()),
            Err(_) => self.string(name).map(|s| s.as_bytes().to_vec()),
        }
    }
}

/// Curl's implicit method on top of another source.
///
/// Without `-X`, `-G` or `-I`, curl sends `POST` when a body flag is
/// present and `GET` otherwise. The core builders have no such
/// default, so the CLI layers it here.
#[derive(Debug, Clone, Copy)]
pub struct CurlDefaults<S> {
    inner: S,
}

impl<S: OptionSource> CurlDefaults<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    fn implicit_method(&self) -> Option<&'static str> {
        let explicit = self.inner.non_empty("request").is_some()
            || self.inner.is_set("get")
            || self.inner.is_set("head");
        if explicit {
            return None;
        }
        if body::resolve(&self.inner).is_some() {
            Some("POST")
        } else {
            Some("GET")
        }
    }
}

impl<S: OptionSource> OptionSource for CurlDefaults<S> {
    fn string(&self, name: &str) -> Option<&str> {
        if name == "request" {
            if let Some(method) = self.implicit_method() {
                return Some(method);
            }
        }
        self.inner.string(name)
    }

    fn flag(&self, name: &str) -> Option<bool> {
        self.inner.flag(name)
    }

    fn float(&self, name: &str) -> Option<f64> {
        self.inner.float(name)
    }

    fn int(&self, name: &str) -> Option<i64> {
        self.inner.int(name)
    }

    fn strings(&self, name: &str) -> Option<Vec<String>> {
        self.inner.strings(name)
    }

    fn mapping(&self, name: &str) -> Option<IndexMap<String, String>> {
        self.inner.mapping(name)
    }

    fn bytes(&self, name: &str) -> Option<Vec<u8>> {
        self.inner.bytes(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        register_flags(Command::new("curlflags"))
            .try_get_matches_from(std::iter::once("curlflags").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn registry_passes_clap_debug_asserts() {
        register_flags(Command::new("curlflags")).debug_assert();
    }

    #[test]
    fn strings_and_switches_are_typed() {
        let matches = parse(&["-X", "PUT", "-G", "-k", "http://example.com"]);
        let source = MatchesSource::new(&matches);
        assert_eq!(source.string("request"), Some("PUT"));
        assert_eq!(source.flag("get"), Some(true));
        assert_eq!(source.flag("head"), Some(false));
        assert!(source.is_set("insecure"));
        assert_eq!(source.string("url"), None);
        assert_eq!(source.positionals(), vec!["http://example.com".to_string()]);
    }

    #[test]
    fn headers_and_cookies_append() {
        let matches = parse(&["-H", "A: 1", "--header", "B: 2", "-b", "a=1; b=2", "-b", "c=3"]);
        let source = MatchesSource::new(&matches);
        assert_eq!(
            source.strings("header"),
            Some(vec!["A: 1".to_string(), "B: 2".to_string()])
        );
        assert_eq!(source.strings("cookie").map(|c| c.len()), Some(2));
    }

    #[test]
    fn form_fields_collect_in_order_with_later_keys_winning() {
        let matches = parse(&["-F", "b=1", "-F", "a=2", "-F", "b=3"]);
        let form = MatchesSource::new(&matches).mapping("form").unwrap();
        assert_eq!(
            form.into_iter().collect::<Vec<_>>(),
            vec![("b".to_string(), "3".to_string()), ("a".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn form_field_without_equals_is_rejected() {
        let result = register_flags(Command::new("curlflags"))
            .try_get_matches_from(["curlflags", "-F", "novalue"]);
        assert!(result.is_err());
    }

    #[test]
    fn data_binary_reads_as_bytes() {
        let matches = parse(&["--data-binary", "a\r\nb"]);
        let source = MatchesSource::new(&matches);
        assert_eq!(source.bytes("data-binary"), Some(b"a\r\nb".to_vec()));
        assert_eq!(source.bytes("request"), None);
        let source = CurlDefaults::new(source);
        assert_eq!(source.string("request"), Some("POST"));
    }

    #[cfg(unix)]
    #[test]
    fn data_binary_accepts_non_utf8() {
        use std::os::unix::ffi::OsStringExt;

        let payload = vec![0xff, 0x00, b'a', 0xfe];
        let args = vec![
            OsString::from("curlflags"),
            OsString::from("--data-binary"),
            OsString::from_vec(payload.clone()),
            OsString::from("http://example.com"),
        ];
        let matches = register_flags(Command::new("curlflags"))
            .try_get_matches_from(args)
            .unwrap();
        let source = CurlDefaults::new(MatchesSource::new(&matches));
        let body = body::resolve(&source).unwrap();
        assert_eq!(body.source, "data-binary");
        assert_eq!(body.body, payload);
    }

    #[test]
    fn remote_name_and_upload_file_are_registered() {
        let matches = parse(&["-O", "out.bin", "-T", "in.bin"]);
        let source = MatchesSource::new(&matches);
        assert_eq!(source.string("remote-name"), Some("out.bin"));
        assert_eq!(source.string("upload-file"), Some("in.bin"));
    }

    #[test]
    fn numbers_are_parsed() {
        let matches = parse(&["-m", "1.5", "--connect-timeout", "3", "--max-redirs", "-1"]);
        let source = MatchesSource::new(&matches);
        assert_eq!(source.float("max-time"), Some(1.5));
        assert_eq!(source.float("connect-timeout"), Some(3.0));
        assert_eq!(source.int("max-redirs"), Some(-1));
    }

    #[test]
    fn unknown_and_mistyped_ids_read_as_absent() {
        let matches = parse(&["-X", "GET"]);
        let source = MatchesSource::new(&matches);
        assert_eq!(source.string("no-such-flag"), None);
        assert_eq!(source.flag("request"), None);
        assert_eq!(source.float("request"), None);
    }

    #[test]
    fn implicit_method_is_get_without_body() {
        let matches = parse(&["http://example.com"]);
        let source = CurlDefaults::new(MatchesSource::new(&matches));
        assert_eq!(source.string("request"), Some("GET"));
    }

    #[test]
    fn implicit_method_is_post_with_body() {
        let matches = parse(&["-d", "a=1", "http://example.com"]);
        let source = CurlDefaults::new(MatchesSource::new(&matches));
        assert_eq!(source.string("request"), Some("POST"));
    }

    #[test]
    fn explicit_method_flags_disable_the_default() {
        for args in [&["-X", "PUT"][..], &["-G", "-d", "a=1"][..], &["-I"][..]] {
            let matches = parse(args);
            let source = CurlDefaults::new(MatchesSource::new(&matches));
            let expected = if args[0] == "-X" { Some("PUT") } else { None };
            assert_eq!(source.string("request"), expected, "{args:?}");
        }
    }
}
