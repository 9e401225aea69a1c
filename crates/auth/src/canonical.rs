//! Parameter canonicalization.
//!
//! The server recomputes every signature from the parameters it receives, so
//! the canonical string must be byte-identical on both sides:
//!
//! - keys sorted by byte order (`BTreeMap` order)
//! - `key=value` pairs joined with `&`, both sides form-encoded
//! - the whole string lowercased, escape sequences included (`%2F` → `%2f`)
//!
//! A mismatch is never reported as a parse error. The server just answers
//! with an authentication failure.

use std::collections::BTreeMap;
use std::fmt;

// ── Parameter set ───────────────────────────────────────────────────

/// Caller-supplied query or form parameters.
///
/// Keys are unique; inserting an existing key replaces its value. Iteration
/// is always in byte order of the keys, which is the order the canonical
/// string uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a parameter, returning the previous value for that key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<String> {
        self.0.insert(key.into(), value.into().0)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Owned pairs in key order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// A scalar parameter value, already rendered the way the API expects it.
///
/// Booleans become `1` / `0`. Numbers use their `Display` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamValue(String);

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self(if value { "1" } else { "0" }.to_string())
    }
}

macro_rules! param_value_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(value: $t) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

param_value_from_display!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

// ── Encoding ────────────────────────────────────────────────────────

/// Form-encode a string for the canonical query.
///
/// Alphanumerics and `-`, `_`, `.` pass through, space becomes `+`,
/// everything else is `%XX` over the UTF-8 bytes.
pub fn form_encode(s: &str) -> String {
    let mut encoded = String::with_capacity(s.len() * 2);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                encoded.push(byte as char);
            }
            b' ' => encoded.push('+'),
            _ => push_escaped(&mut encoded, byte),
        }
    }
    encoded
}

/// Percent-encode a string per RFC 3986 (unreserved set kept, space as `%20`).
pub fn raw_encode(s: &str) -> String {
    let mut encoded = String::with_capacity(s.len() * 2);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => push_escaped(&mut encoded, byte),
        }
    }
    encoded
}

fn push_escaped(out: &mut String, byte: u8) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    out.push('%');
    out.push(HEX[(byte >> 4) as usize] as char);
    out.push(HEX[(byte & 0x0F) as usize] as char);
}

// ── Canonical forms ─────────────────────────────────────────────────

/// Build the canonical query string for a parameter set.
///
/// An empty set yields an empty string.
pub fn canonical_query(params: &Params) -> String {
    let joined = params
        .iter()
        .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    // Encoding leaves only ASCII behind.
    joined.to_ascii_lowercase()
}

/// Normalize an upload filename: percent-encode, then lowercase.
///
/// The same normalized name goes into the POST signing string and the
/// multipart `filename` attribute.
pub fn normalize_file_name(file_name: &str) -> String {
    raw_encode(file_name).to_ascii_lowercase()
}
