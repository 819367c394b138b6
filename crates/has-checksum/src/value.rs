//! Printable field values.

use std::fmt::{self, Display};

use chrono::{DateTime, Utc};
use has_checksum_crypto::DigestValue;
use serde::{Deserialize, Serialize};

/// The current value of a field, as seen by the digest input.
///
/// Each variant has a canonical form, written by
/// [`write_canonical`](Self::write_canonical), which is what gets
/// concatenated into the digest input. For everything but `Bytes` that is
/// the [`Display`] text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// An absent value. Renders as the empty string.
    #[default]
    Null,

    /// Renders as `true` / `false`.
    Bool(bool),

    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point. Whole values keep one decimal (`1.0`), the rest use
    /// the shortest round-trip form.
    Float(f64),

    /// UTF-8 text, rendered verbatim.
    Text(String),
    /// Raw bytes, fed to digests verbatim. Displayed as lossy UTF-8.
    Bytes(Vec<u8>),

    /// A point in time, rendered as `2024-01-02 03:04:05 UTC`.
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text, if this is a [`FieldValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Appends the canonical form of this value to a digest input.
    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        match self {
            Self::Null => {}
            Self::Bytes(bytes) => out.extend_from_slice(bytes),
            Self::Text(text) => out.extend_from_slice(text.as_bytes()),
            other => out.extend_from_slice(other.to_string().as_bytes()),
        }
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_canonical(&mut out);
        out
    }

    /// Converts a stored column value back into the digest it holds.
    ///
    /// Returns `None` for `Null`, which means nothing has been stored yet.
    pub fn to_digest(&self) -> Option<DigestValue> {
        match self {
            Self::Null => None,
            Self::Bytes(bytes) => Some(DigestValue::Binary(bytes.clone())),
            Self::Text(text) => Some(DigestValue::Text(text.clone())),
            other => Some(DigestValue::Text(other.to_string())),
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::Float(n) if n.is_infinite() => {
                f.write_str(if n.is_sign_negative() { "-Infinity" } else { "Infinity" })
            }
            Self::Float(n) if n.fract() == 0.0 => write!(f, "{n:.1}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            Self::Timestamp(ts) => write!(f, "{ts}"),
        }
    }
}

impl From<DigestValue> for FieldValue {
    fn from(value: DigestValue) -> Self {
        match value {
            DigestValue::Text(text) => Self::Text(text),
            DigestValue::Binary(bytes) => Self::Bytes(bytes),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        Self::UInt(u64::from(v))
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
