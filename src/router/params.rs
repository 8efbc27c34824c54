//! Path parameters captured by a matched route.
//!
//! Captured text is coerced the way a numeric-aware JSON round trip would coerce it:
//! integer-looking captures become [`ParamValue::Int`], decimal or exponent captures
//! become [`ParamValue::Float`], everything else stays a [`ParamValue::Str`].

use std::fmt;

use regex::{Captures, Regex};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single coerced parameter value.
///
/// # Examples
///
/// ```
/// use rttp_router::router::ParamValue;
///
/// assert_eq!(ParamValue::coerce("123"), ParamValue::Int(123));
/// assert_eq!(ParamValue::coerce("-1.5"), ParamValue::Float(-1.5));
/// assert_eq!(ParamValue::coerce("v1"), ParamValue::Str("v1".into()));
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    /// Coerce raw captured text into the most specific value it represents.
    pub fn coerce(raw: &str) -> Self {
        if is_integer(raw) {
            return match raw.parse::<i64>() {
                Ok(n) => Self::Int(n),
                Err(_) => raw
                    .parse::<f64>()
                    .map(Self::Float)
                    .unwrap_or_else(|_| Self::Str(raw.to_owned())),
            };
        }
        if is_decimal(raw) {
            if let Ok(n) = raw.parse::<f64>() {
                if n.is_finite() {
                    return Self::Float(n);
                }
            }
        }
        Self::Str(raw.to_owned())
    }

    /// Returns the value as a string slice if it is a [`ParamValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value if it is a [`ParamValue::Int`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as `f64` for either numeric variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            Self::Str(_) => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

// Optional sign followed by one or more ASCII digits.
fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// Optional sign, digits with at most one `.`, at least one digit, optional exponent.
// Rejects the textual specials (`inf`, `NaN`) that `f64::from_str` would accept.
fn is_decimal(raw: &str) -> bool {
    let body = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    };

    let mut seen_dot = false;
    let mut seen_digit = false;
    for b in mantissa.bytes() {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }

    seen_digit && exponent.is_none_or(is_integer)
}

/// Ordered `name → value` parameters of a match, in capture-group order.
///
/// Serializes as a JSON object with keys in capture order.
///
/// # Examples
///
/// ```
/// use rttp_router::router::{ParamValue, Params};
///
/// let mut params = Params::new();
/// params.insert("id", ParamValue::Int(7));
/// assert_eq!(params.get("id").and_then(ParamValue::as_i64), Some(7));
/// assert!(params.get("missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    inner: Vec<(String, ParamValue)>,
}

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every named group that took part in the match, coercing each value.
    pub fn from_captures(regex: &Regex, captures: &Captures<'_>) -> Self {
        let inner = regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                captures
                    .name(name)
                    .map(|m| (name.to_owned(), ParamValue::coerce(m.as_str())))
            })
            .collect();
        Self { inner }
    }

    /// Inserts a value, replacing an existing entry of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        let name = name.into();
        match self.inner.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.inner.push((name, value)),
        }
    }

    /// Returns the value for `name`, or `None`.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.inner.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Returns `true` if a parameter named `name` was captured.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if no parameters were captured.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over `(name, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.inner.len()))?;
        for (name, value) in &self.inner {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
