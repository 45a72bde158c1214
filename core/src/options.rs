//! Typed access to curl-style option values.
//!
//! # Design
//! Builders never see a flag parser. They read values through
//! `OptionSource`, whose getters return `None` both when a flag was never
//! given and when it holds a value of another type. An explicitly empty
//! string is still `Some("")`, so precedence rules can tell "unset" from
//! "set to nothing" when they need to.
//!
//! `Options` is the in-memory implementation. It deserializes from a plain
//! JSON object (`{"request": "POST", "header": ["A: b"], "form": {"k": "v"}}`),
//! which is how library callers and the test vectors supply snapshots.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Read-only, typed view over a set of named flags.
pub trait OptionSource {
    fn string(&self, name: &str) -> Option<&str>;
    fn flag(&self, name: &str) -> Option<bool>;
    fn float(&self, name: &str) -> Option<f64>;
    fn int(&self, name: &str) -> Option<i64>;
    fn strings(&self, name: &str) -> Option<Vec<String>>;
    fn mapping(&self, name: &str) -> Option<IndexMap<String, String>>;

    /// Raw bytes of a value. Sources that can hold non-UTF-8 input override
    /// this; the default reads the string value.
    fn bytes(&self, name: &str) -> Option<Vec<u8>> {
        self.string(name).map(|s| s.as_bytes().to_vec())
    }

    /// Non-empty string value, or `None`.
    fn non_empty(&self, name: &str) -> Option<&str> {
        self.string(name).filter(|s| !s.is_empty())
    }

    /// `true` only when the flag is present and set.
    fn is_set(&self, name: &str) -> bool {
        self.flag(name).unwrap_or(false)
    }
}

impl<T: OptionSource + ?Sized> OptionSource for &T {
    fn string(&self, name: &str) -> Option<&str> {
        (**self).string(name)
    }

    fn flag(&self, name: &str) -> Option<bool> {
        (**self).flag(name)
    }

    fn float(&self, name: &str) -> Option<f64> {
        (**self).float(name)
    }

    fn int(&self, name: &str) -> Option<i64> {
        (**self).int(name)
    }

    fn strings(&self, name: &str) -> Option<Vec<String>> {
        (**self).strings(name)
    }

    fn mapping(&self, name: &str) -> Option<IndexMap<String, String>> {
        (**self).mapping(name)
    }

    fn bytes(&self, name: &str) -> Option<Vec<u8>> {
        (**self).bytes(name)
    }
}

/// A single option value.
///
/// Untagged so that JSON scalars, arrays and objects map directly. Integers
/// deserialize as `Int`; the float getter accepts them too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<String>),
    Map(IndexMap<String, String>),
}

/// In-memory option snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options {
    values: HashMap<String, OptionValue>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, replacing any previous value for `name`.
    pub fn with(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<OptionValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl OptionSource for Options {
    fn string(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    fn flag(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn float(&self, name: &str) -> Option<f64> {
        match self.values.get(name)? {
            OptionValue::Float(f) => Some(*f),
            OptionValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name)? {
            OptionValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn strings(&self, name: &str) -> Option<Vec<String>> {
        match self.values.get(name)? {
            OptionValue::List(items) => Some(items.clone()),
            _ => None,
        }
    }

    fn mapping(&self, name: &str) -> Option<IndexMap<String, String>> {
        match self.values.get(name)? {
            OptionValue::Map(map) => Some(map.clone()),
            _ => None,
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        OptionValue::Int(i)
    }
}

impl From<f64> for OptionValue {
    fn from(f: f64) -> Self {
        OptionValue::Float(f)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::String(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::String(s)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(items: Vec<String>) -> Self {
        OptionValue::List(items)
    }
}

impl From<&[&str]> for OptionValue {
    fn from(items: &[&str]) -> Self {
        OptionValue::List(items.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for OptionValue {
    fn from(items: [&str; N]) -> Self {
        OptionValue::List(items.iter().map(|s| s.to_string()).collect())
    }
}

impl From<IndexMap<String, String>> for OptionValue {
    fn from(map: IndexMap<String, String>) -> Self {
        OptionValue::Map(map)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for OptionValue {
    fn from(pairs: [(&str, &str); N]) -> Self {
        OptionValue::Map(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_and_empty_are_distinct() {
        let opts = Options::new().with("request", "");
        assert_eq!(opts.string("request"), Some(""));
        assert_eq!(opts.non_empty("request"), None);
        assert_eq!(opts.string("url"), None);
    }

    #[test]
    fn type_mismatch_reads_as_absent() {
        let opts = Options::new().with("get", "yes").with("header", true);
        assert_eq!(opts.flag("get"), None);
        assert!(!opts.is_set("get"));
        assert_eq!(opts.strings("header"), None);
    }

    #[test]
    fn float_accepts_integers() {
        let opts = Options::new().with("max-time", 2i64);
        assert_eq!(opts.float("max-time"), Some(2.0));
        assert_eq!(opts.int("max-time"), Some(2));
    }

    #[test]
    fn deserializes_from_json_object() {
        let opts: Options = serde_json::from_str(
            r#"{"request":"POST","get":true,"max-time":1.5,"max-redirs":3,
                "header":["A: b"],"form":{"z":"1","a":"2"}}"#,
        )
        .unwrap();
        assert_eq!(opts.string("request"), Some("POST"));
        assert_eq!(opts.flag("get"), Some(true));
        assert_eq!(opts.float("max-time"), Some(1.5));
        assert_eq!(opts.int("max-redirs"), Some(3));
        assert_eq!(opts.strings("header"), Some(vec!["A: b".to_string()]));
        let form = opts.mapping("form").unwrap();
        assert_eq!(form.keys().collect::<Vec<_>>(), vec!["z", "a"]);
    }

    #[test]
    fn references_are_sources() {
        fn read(source: impl OptionSource) -> Option<String> {
            source.string("url").map(str::to_string)
        }
        let opts = Options::new().with("url", "http://x.com");
        assert_eq!(read(&opts), Some("http://x.com".to_string()));
    }
}
