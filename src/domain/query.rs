//! Query String Encoding
//!
//! Turns an ordered list of named parameters into the query string the
//! Birdeye API expects:
//! - Absent values and strings that are empty after trimming are dropped
//! - Strings are trimmed, percent-encoded as a URI component, spaces become `+`
//! - Numbers are percent-encoded from their plain decimal form
//! - Pairs keep insertion order and are joined with `&` (no leading `?`)

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left untouched by URI component encoding: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A single scalar query value
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl QueryValue {
    /// Encode the value, or `None` when the value must be omitted
    fn encode(&self) -> Option<String> {
        match self {
            QueryValue::Int(n) => Some(encode_component(&n.to_string())),
            QueryValue::Float(n) => Some(encode_component(&n.to_string())),
            QueryValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                Some(encode_component(trimmed).replace("%20", "+"))
            }
        }
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(i64::from(value))
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(n) => QueryValue::Int(n),
            Err(_) => QueryValue::Text(value.to_string()),
        }
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

/// Ordered mapping of parameter name to optional value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, Option<QueryValue>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter that is always set
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.pairs.push((key.into(), Some(value.into())));
        self
    }

    /// Append a parameter that may be absent
    pub fn with_opt<V: Into<QueryValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.pairs.push((key.into(), value.map(Into::into)));
        self
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode into a query string without the leading `?`
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .filter_map(|(key, value)| {
                let encoded = value.as_ref()?.encode()?;
                Some(format!("{}={}", key, encoded))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}
