//! Digest and HMAC algorithm namespaces.
//!
//! Checksums and signatures resolve against separate namespaces: a checksum
//! can use any plain digest below, while a signature needs a digest usable
//! inside HMAC. Both cover the MD5, SHA-1 and SHA-2 families.
//!
//! # Example
//!
//! ```
//! use has_checksum_crypto::{Format, resolve_checksum_algorithm, resolve_signature_algorithm};
//!
//! let sha256 = resolve_checksum_algorithm("SHA256").unwrap();
//! assert_eq!(
//!     sha256.checksum(b"sshaw", Format::Hex),
//!     "5b891e901f3c8859115dcdfe323944ec7b4abbde9f7b680430fca7d2c7af89e5"
//! );
//!
//! let hmac = resolve_signature_algorithm("sha256").unwrap();
//! assert_eq!(
//!     hmac.sign(b"xxx", b"sshaw", Format::Hex),
//!     "d61d500cf25a707858515d43b24602fa91e2ce400b2814630f13387f6bd86a0c"
//! );
//! ```

use std::fmt::{self, Display};
use std::str::FromStr;

use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};

use crate::{CryptoError, DigestValue, Format};

// -----------------------------------------------------------------------------
// Checksum namespace
// -----------------------------------------------------------------------------

/// A plain digest usable for checksums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl ChecksumAlgorithm {
    pub const ALL: [Self; 5] = [Self::Md5, Self::Sha1, Self::Sha256, Self::Sha384, Self::Sha512];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Length of the raw digest in bytes.
    pub fn output_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Hashes `data`, returning the raw digest bytes.
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Md5 => hash::<Md5>(data),
            Self::Sha1 => hash::<Sha1>(data),
            Self::Sha256 => hash::<Sha256>(data),
            Self::Sha384 => hash::<Sha384>(data),
            Self::Sha512 => hash::<Sha512>(data),
        }
    }

    /// Hashes `data` and renders the digest in `format`.
    pub fn checksum(self, data: &[u8], format: Format) -> DigestValue {
        format.encode(self.digest(data))
    }
}

impl Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve_checksum_algorithm(s)
    }
}

/// Resolves a checksum algorithm name, ignoring ASCII case.
///
/// Accepts `md5`, `sha1`, `sha256`, `sha384`, `sha512` and their dashed
/// spellings (`sha-256`).
///
/// # Errors
///
/// Returns [`CryptoError::UnknownAlgorithm`] carrying the identifier as given.
pub fn resolve_checksum_algorithm(identifier: &str) -> Result<ChecksumAlgorithm, CryptoError> {
    match normalize(identifier).as_str() {
        "md5" => Ok(ChecksumAlgorithm::Md5),
        "sha1" => Ok(ChecksumAlgorithm::Sha1),
        "sha256" => Ok(ChecksumAlgorithm::Sha256),
        "sha384" => Ok(ChecksumAlgorithm::Sha384),
        "sha512" => Ok(ChecksumAlgorithm::Sha512),
        _ => Err(CryptoError::UnknownAlgorithm(identifier.to_string())),
    }
}

// -----------------------------------------------------------------------------
// Signature namespace
// -----------------------------------------------------------------------------

/// A digest usable as the hash function of an HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
}

/// Runs an HMAC over `$msg` keyed with `$key` using digest `$hash`.
///
/// HMAC accepts keys of any length (long keys are hashed, short ones padded),
/// so construction cannot fail.
macro_rules! hmac_with {
    ($hash:ty, $key:expr, $msg:expr) => {{
        let mut mac = <Hmac<$hash> as Mac>::new_from_slice($key)
            .expect("HMAC accepts keys of any length");
        mac.update($msg);
        mac.finalize().into_bytes().to_vec()
    }};
}

impl SignatureAlgorithm {
    pub const ALL: [Self; 8] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha512_224,
        Self::Sha512_256,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha512_224 => "sha512-224",
            Self::Sha512_256 => "sha512-256",
        }
    }

    /// Computes HMAC(`key`, `data`), returning the raw tag bytes.
    pub fn hmac(self, key: &[u8], data: &[u8]) -> Vec<u8> {
        match self {
            Self::Md5 => hmac_with!(Md5, key, data),
            Self::Sha1 => hmac_with!(Sha1, key, data),
            Self::Sha224 => hmac_with!(Sha224, key, data),
            Self::Sha256 => hmac_with!(Sha256, key, data),
            Self::Sha384 => hmac_with!(Sha384, key, data),
            Self::Sha512 => hmac_with!(Sha512, key, data),
            Self::Sha512_224 => hmac_with!(Sha512_224, key, data),
            Self::Sha512_256 => hmac_with!(Sha512_256, key, data),
        }
    }

    /// Computes the HMAC and renders it as hex or binary.
    ///
    /// Formats other than [`Format::Binary`] render as hex.
    pub fn sign(self, key: &[u8], data: &[u8], format: Format) -> DigestValue {
        format.for_signature().encode(self.hmac(key, data))
    }
}

impl Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve_signature_algorithm(s)
    }
}

/// Resolves an HMAC digest name, ignoring ASCII case.
///
/// Accepts everything [`resolve_checksum_algorithm`] does plus `sha224`,
/// `sha512-224` and `sha512-256`.
///
/// # Errors
///
/// Returns [`CryptoError::UnknownAlgorithm`] carrying the identifier as given.
pub fn resolve_signature_algorithm(identifier: &str) -> Result<SignatureAlgorithm, CryptoError> {
    match normalize(identifier).as_str() {
        "md5" => Ok(SignatureAlgorithm::Md5),
        "sha1" => Ok(SignatureAlgorithm::Sha1),
        "sha224" => Ok(SignatureAlgorithm::Sha224),
        "sha256" => Ok(SignatureAlgorithm::Sha256),
        "sha384" => Ok(SignatureAlgorithm::Sha384),
        "sha512" => Ok(SignatureAlgorithm::Sha512),
        "sha512224" | "sha512/224" => Ok(SignatureAlgorithm::Sha512_224),
        "sha512256" | "sha512/256" => Ok(SignatureAlgorithm::Sha512_256),
        _ => Err(CryptoError::UnknownAlgorithm(identifier.to_string())),
    }
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn hash<D: Digest>(data: &[u8]) -> Vec<u8> {
    D::digest(data).to_vec()
}

/// Lowercases and strips dashes/underscores: `SHA-256` and `sha_256` both
/// become `sha256`.
fn normalize(identifier: &str) -> String {
    identifier
        .trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("sha256", ChecksumAlgorithm::Sha256)]
    #[test_case("SHA256", ChecksumAlgorithm::Sha256)]
    #[test_case("sha-256", ChecksumAlgorithm::Sha256)]
    #[test_case("md5", ChecksumAlgorithm::Md5)]
    #[test_case("MD5", ChecksumAlgorithm::Md5)]
    #[test_case("sha1", ChecksumAlgorithm::Sha1)]
    #[test_case("sha384", ChecksumAlgorithm::Sha384)]
    #[test_case("sha512", ChecksumAlgorithm::Sha512)]
    fn resolves_checksum_names(name: &str, expected: ChecksumAlgorithm) {
        assert_eq!(resolve_checksum_algorithm(name).unwrap(), expected);
    }

    #[test_case("x"; "single letter")]
    #[test_case(""; "empty")]
    #[test_case("sha224"; "hmac only digest")]
    #[test_case("rot13"; "not a digest")]
    fn rejects_unknown_checksum_names(name: &str) {
        assert_eq!(
            resolve_checksum_algorithm(name),
            Err(CryptoError::UnknownAlgorithm(name.to_string()))
        );
    }

    #[test_case("sha224", SignatureAlgorithm::Sha224)]
    #[test_case("SHA512-256", SignatureAlgorithm::Sha512_256)]
    #[test_case("sha512/224", SignatureAlgorithm::Sha512_224)]
    #[test_case("md5", SignatureAlgorithm::Md5)]
    fn resolves_signature_names(name: &str, expected: SignatureAlgorithm) {
        assert_eq!(resolve_signature_algorithm(name).unwrap(), expected);
    }

    #[test]
    fn unknown_signature_algorithm_carries_identifier() {
        let err = resolve_signature_algorithm("y").unwrap_err();
        assert_eq!(err.to_string(), "unknown algorithm 'y'");
    }

    #[test]
    fn canonical_names_round_trip() {
        for alg in ChecksumAlgorithm::ALL {
            assert_eq!(alg.name().parse::<ChecksumAlgorithm>().unwrap(), alg);
        }
        for alg in SignatureAlgorithm::ALL {
            assert_eq!(alg.name().parse::<SignatureAlgorithm>().unwrap(), alg);
        }
    }

    #[test_case(ChecksumAlgorithm::Md5, "36936453856a6ba3d2ea1b8ce2f20aa6")]
    #[test_case(ChecksumAlgorithm::Sha1, "c4148c562a92a945856be21da40578dd0eb933d3")]
    #[test_case(
        ChecksumAlgorithm::Sha256,
        "5b891e901f3c8859115dcdfe323944ec7b4abbde9f7b680430fca7d2c7af89e5"
    )]
    #[test_case(
        ChecksumAlgorithm::Sha384,
        "1d8e62eda85308e9d7a43a875f9608533d0a188606b92af4172bac03b99b4fe7a4adeffbd4cf4ebe250108ef06ad1210"
    )]
    fn checksum_known_vectors(alg: ChecksumAlgorithm, expected: &str) {
        assert_eq!(alg.checksum(b"sshaw", Format::Hex), expected);
    }

    #[test]
    fn checksum_base64_and_bubblebabble() {
        assert_eq!(
            ChecksumAlgorithm::Md5.checksum(b"sshaw", Format::Base64),
            "NpNkU4Vqa6PS6huM4vIKpg=="
        );
        assert_eq!(
            ChecksumAlgorithm::Md5.checksum(b"sshaw", Format::Bubblebabble),
            "xetin-fonuh-focok-pypap-fyguv-pukum-sumyz-dydop-koxax"
        );
    }

    #[test]
    fn digest_lengths_match_output_len() {
        for alg in ChecksumAlgorithm::ALL {
            assert_eq!(alg.digest(b"abc").len(), alg.output_len());
        }
    }

    #[test_case(SignatureAlgorithm::Md5, "57be96a502b7c8ea0cd7ab7da4761b9c")]
    #[test_case(SignatureAlgorithm::Sha1, "f9f5ec15d5f2ae174be5a4680dc5949022e8ac0c")]
    #[test_case(
        SignatureAlgorithm::Sha224,
        "47cf6653e168050fe6ec0076f445af4be638e5ac60d3ebc19e1a7e14"
    )]
    #[test_case(
        SignatureAlgorithm::Sha256,
        "d61d500cf25a707858515d43b24602fa91e2ce400b2814630f13387f6bd86a0c"
    )]
    #[test_case(
        SignatureAlgorithm::Sha384,
        "7e6cc2bf146d78c02b39596803aeaf729a81de4a5014b53168a0d2cf7cb15624eb7ed25a23b0650591596625a739296b"
    )]
    fn hmac_known_vectors(alg: SignatureAlgorithm, expected: &str) {
        assert_eq!(alg.sign(b"xxx", b"sshaw", Format::Hex), expected);
    }

    #[test]
    fn signature_ignores_checksum_only_formats() {
        let hex = SignatureAlgorithm::Sha256.sign(b"xxx", b"sshaw", Format::Hex);
        assert_eq!(
            SignatureAlgorithm::Sha256.sign(b"xxx", b"sshaw", Format::Base64),
            hex
        );
        assert_eq!(
            SignatureAlgorithm::Sha256.sign(b"xxx", b"sshaw", Format::Bubblebabble),
            hex
        );
    }

    #[test]
    fn binary_signature_is_raw_tag() {
        let value = SignatureAlgorithm::Sha256.sign(b"xxx", b"sshaw", Format::Binary);
        assert_eq!(
            value,
            DigestValue::Binary(SignatureAlgorithm::Sha256.hmac(b"xxx", b"sshaw"))
        );
        assert_eq!(value.as_bytes().len(), 32);
    }

    #[test]
    fn hmac_is_key_sensitive() {
        let a = SignatureAlgorithm::Sha256.hmac(b"xxx", b"sshaw");
        let b = SignatureAlgorithm::Sha256.hmac(b"yyy", b"sshaw");
        assert_ne!(a, b);
        assert_eq!(
            hex::encode(b),
            "97d4b0aad7bc14938093e9af1c1bc17b9bccf7f64312aec5caf83de1727487cf"
        );
    }

    #[test]
    fn empty_key_is_accepted() {
        let tag = SignatureAlgorithm::Sha256.hmac(b"", b"sshaw");
        assert_eq!(tag.len(), 32);
    }
}
