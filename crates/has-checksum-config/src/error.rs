//! Errors raised while reading digest defaults

use std::path::PathBuf;

use has_checksum_crypto::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not valid TOML: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A default algorithm does not resolve in its section's namespace.
    #[error("default {section} algorithm: {source}")]
    InvalidAlgorithm {
        section: &'static str,
        source: CryptoError,
    },

    #[error("no home directory to hold the user config file")]
    NoHomeDirectory,
}
