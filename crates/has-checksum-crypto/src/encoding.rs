//! Output encodings for digest and HMAC results.

use std::fmt::{self, Display};
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::{CryptoError, bubblebabble};

/// How a raw digest is rendered before it is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Lowercase hexadecimal text.
    #[default]
    Hex,
    /// The raw digest bytes.
    Binary,
    /// Standard padded base64 text. Checksums only.
    Base64,
    /// Bubble Babble words. Checksums only.
    Bubblebabble,
}

impl Format {
    /// Parses a format name, ignoring ASCII case.
    pub fn parse(name: &str) -> Result<Self, CryptoError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "hex" | "hexdigest" => Ok(Self::Hex),
            "binary" | "digest" => Ok(Self::Binary),
            "base64" | "base64digest" => Ok(Self::Base64),
            "bubblebabble" => Ok(Self::Bubblebabble),
            _ => Err(CryptoError::UnknownFormat(name.to_string())),
        }
    }

    /// Narrows the format to the encodings signatures support.
    ///
    /// Signatures render as hex or binary; anything else falls back to hex.
    pub fn for_signature(self) -> Self {
        match self {
            Self::Binary => Self::Binary,
            Self::Hex | Self::Base64 | Self::Bubblebabble => Self::Hex,
        }
    }

    /// Renders `bytes` in this format.
    pub fn encode(self, bytes: Vec<u8>) -> DigestValue {
        match self {
            Self::Hex => DigestValue::Text(hex::encode(bytes)),
            Self::Binary => DigestValue::Binary(bytes),
            Self::Base64 => DigestValue::Text(STANDARD.encode(bytes)),
            Self::Bubblebabble => DigestValue::Text(bubblebabble::encode(&bytes)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Binary => "binary",
            Self::Base64 => "base64",
            Self::Bubblebabble => "bubblebabble",
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A computed checksum or signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestValue {
    /// Textual output: hex, base64, bubblebabble, or a transform result.
    Text(String),
    /// Raw digest bytes.
    Binary(Vec<u8>),
}

impl DigestValue {
    /// Returns the text form, if this value is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    /// Returns the underlying bytes regardless of representation.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }
}

impl From<String> for DigestValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for DigestValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(bytes)
    }
}

impl PartialEq<str> for DigestValue {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<&str> for DigestValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl Display for DigestValue {
    /// Text values print verbatim; binary values print as hex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Binary(bytes) => f.write_str(&hex::encode(bytes)),
        }
    }
}
