//! Ordered request parameters and their canonical query encoding.
//!
//! The encoded string is both what gets signed and what gets transmitted, so
//! encoding is done exactly once per request and never re-ordered afterwards.
//!
//! Encoding rules:
//! - pairs are emitted in insertion order (no sorting);
//! - pairs whose value is `None` are omitted;
//! - integers, floats and decimals render in plain decimal notation;
//! - booleans render as `true` / `false`;
//! - lists render comma-joined (`a,b,c`) as a single value;
//! - keys and values are percent-encoded (RFC 3986 unreserved set kept).

use std::fmt;

use rust_decimal::Decimal;

use crate::api::error::{ApiError, ApiResult};

/// Name of the receive-window parameter.
pub const RECV_WINDOW: &str = "recvWindow";

/// Name of the request timestamp parameter.
pub const TIMESTAMP: &str = "timestamp";

/// Name of the signature parameter.
pub const SIGNATURE: &str = "signature";

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Decimal(Decimal),
    Bool(bool),
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Whether this value can be rendered (floats must be finite).
    fn is_finite(&self) -> bool {
        match self {
            ParamValue::Float(f) => f.is_finite(),
            ParamValue::List(items) => items.iter().all(ParamValue::is_finite),
            _ => true,
        }
    }

    /// Whether this value is an empty string or an empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            ParamValue::Str(s) => s.is_empty(),
            ParamValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    fn as_positive_integer(&self) -> Option<u64> {
        match self {
            ParamValue::Int(i) if *i > 0 => Some(*i as u64),
            ParamValue::UInt(u) if *u > 0 => Some(*u),
            ParamValue::Str(s) => s.parse::<u64>().ok().filter(|v| *v > 0),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::UInt(u) => write!(f, "{}", u),
            // f64 Display never uses exponent notation.
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Decimal(d) => write!(f, "{}", d),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        ParamValue::Str(v.clone())
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::UInt(v as u64)
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        ParamValue::UInt(v)
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        ParamValue::UInt(v as u64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<Decimal> for ParamValue {
    fn from(v: Decimal) -> Self {
        ParamValue::Decimal(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        ParamValue::List(v.into_iter().map(Into::into).collect())
    }
}

/// Ordered parameter map. Insertion order is preserved on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    pairs: Vec<(String, Option<ParamValue>)>,
}

impl Params {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Append a parameter that may be absent. `None` is never transmitted.
    pub fn with_opt<V: Into<ParamValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.push_opt(key, value);
        self
    }

    /// Append a parameter in place.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.pairs.push((key.into(), Some(value.into())));
    }

    /// Append a parameter that may be absent, in place.
    pub fn push_opt<V: Into<ParamValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        self.pairs.push((key.into(), value.map(Into::into)));
    }

    /// Replace the value of `key` where it stands, or append it if new.
    pub fn set(&mut self, key: impl Into<String>, value: Option<ParamValue>) {
        let key = key.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Merge `other` into `self`. Existing keys keep their position and take
    /// the new value; new keys are appended in `other`'s order.
    pub fn merge(mut self, other: Params) -> Self {
        for (key, value) in other.pairs {
            self.set(key, value);
        }
        self
    }

    /// Value of `key`, if present and not absent.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Whether `key` is present with a value.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of pairs, including absent ones.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over present pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.pairs
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    /// Check values that cannot be encoded or that the exchange would reject
    /// structurally.
    pub fn validate(&self) -> ApiResult<()> {
        for (key, value) in self.iter() {
            if !value.is_finite() {
                return Err(ApiError::InvalidParameter(format!(
                    "{} must be a finite number",
                    key
                )));
            }
            if key == RECV_WINDOW && value.as_positive_integer().is_none() {
                return Err(ApiError::InvalidParameter(format!(
                    "{} must be a positive integer (milliseconds), got {}",
                    RECV_WINDOW, value
                )));
            }
        }
        Ok(())
    }

    /// Canonical query encoding. See [`encode`].
    pub fn encode(&self) -> String {
        encode(self)
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

/// Encode parameters into the canonical query string.
pub fn encode(params: &Params) -> String {
    let mut out = String::new();
    for (key, value) in params.iter() {
        if !out.is_empty() {
            out.push('&');
        }
        out.push_str(&urlencoding::encode(key));
        out.push('=');
        out.push_str(&urlencoding::encode(&value.to_string()));
    }
    out
}
