//! Resolver error types

use thiserror::Error;

/// Errors raised while resolving algorithm or format identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The identifier does not name a digest known to this crate.
    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),

    /// The identifier does not name an output encoding.
    #[error("unknown format '{0}'")]
    UnknownFormat(String),
}
