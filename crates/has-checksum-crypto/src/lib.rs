//! # has-checksum-crypto: Digest resolution for `has-checksum`
//!
//! Maps user-facing identifiers onto concrete primitives and encodings:
//! - Checksum digests ([`ChecksumAlgorithm`], [`resolve_checksum_algorithm`])
//! - HMAC digests ([`SignatureAlgorithm`], [`resolve_signature_algorithm`])
//! - Output encodings ([`Format`], [`DigestValue`], [`bubblebabble`])
//!
//! The primitives themselves come from the RustCrypto crates (`sha2`, `sha1`,
//! `md-5`, `hmac`). This crate only decides *which* one runs and how its
//! output is rendered.

mod algorithm;
pub mod bubblebabble;
mod encoding;
mod error;

pub use algorithm::{
    ChecksumAlgorithm, SignatureAlgorithm, resolve_checksum_algorithm,
    resolve_signature_algorithm,
};
pub use encoding::{DigestValue, Format};
pub use error::CryptoError;
