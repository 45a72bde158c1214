//! Body resolution for the mutually exclusive data flags.
//!
//! # Design
//! `RESOLVERS` lists one resolver per body flag, highest precedence first.
//! `resolve` walks the table and stops at the first resolver that yields a
//! body; every later source is ignored, never merged.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::options::OptionSource;

/// A resolved body plus the synthetic headers its source implies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedBody {
    /// Flag that produced the body.
    pub source: &'static str,
    pub body: Vec<u8>,
    pub headers: Vec<(&'static str, &'static str)>,
}

type Resolver = fn(&dyn OptionSource) -> Option<ResolvedBody>;

/// Body sources in precedence order.
pub const RESOLVERS: &[(&str, Resolver)] = &[
    ("data", data),
    ("data-binary", data_binary),
    ("data-raw", data_raw),
    ("data-urlencode", data_urlencode),
    ("form", form),
    ("json", json),
];

/// Resolve the request body from the first body flag that is set.
pub fn resolve(options: &dyn OptionSource) -> Option<ResolvedBody> {
    RESOLVERS.iter().find_map(|(_, resolver)| resolver(options))
}

fn verbatim(options: &dyn OptionSource, source: &'static str) -> Option<ResolvedBody> {
    options.non_empty(source).map(|value| ResolvedBody {
        source,
        body: value.as_bytes().to_vec(),
        headers: Vec::new(),
    })
}

fn data(options: &dyn OptionSource) -> Option<ResolvedBody> {
    verbatim(options, "data")
}

fn data_binary(options: &dyn OptionSource) -> Option<ResolvedBody> {
    let body = options.bytes("data-binary").filter(|b| !b.is_empty())?;
    Some(ResolvedBody {
        source: "data-binary",
        body,
        headers: Vec::new(),
    })
}

fn data_raw(options: &dyn OptionSource) -> Option<ResolvedBody> {
    verbatim(options, "data-raw")
}

fn data_urlencode(options: &dyn OptionSource) -> Option<ResolvedBody> {
    options.non_empty("data-urlencode").map(|value| ResolvedBody {
        source: "data-urlencode",
        body: encode_data(value).into_bytes(),
        headers: Vec::new(),
    })
}

fn form(options: &dyn OptionSource) -> Option<ResolvedBody> {
    let fields = options.mapping("form").filter(|fields| !fields.is_empty())?;
    let pairs: Vec<String> = fields.iter().map(|(k, v)| format!("{k}={v}")).collect();
    Some(ResolvedBody {
        source: "form",
        body: pairs.join("&").into_bytes(),
        headers: vec![("Content-Type", "application/x-www-form-urlencoded")],
    })
}

fn json(options: &dyn OptionSource) -> Option<ResolvedBody> {
    options.non_empty("json").map(|value| ResolvedBody {
        source: "json",
        body: value.as_bytes().to_vec(),
        headers: vec![
            ("Content-Type", "application/json"),
            ("Accept", "application/json"),
        ],
    })
}

/// Encode a `--data-urlencode` value.
///
/// With a `=`, everything up to and including the first `=` is kept as-is
/// and only the content after it is encoded.
pub fn encode_data(value: &str) -> String {
    match value.split_once('=') {
        Some((name, content)) => format!("{name}={}", query_escape(content)),
        None => query_escape(value),
    }
}

/// Bytes left literal by query escaping. Space is kept here and turned into
/// `+` afterwards.
const QUERY_ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b' ');

fn query_escape(s: &str) -> String {
    utf8_percent_encode(s, QUERY_ESCAPE_SET)
        .to_string()
        .replace(' ', "+")
}
