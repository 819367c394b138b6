//! Declaration error types.
//!
//! Every variant is raised while a declaration is being configured, never
//! when an accessor runs. Persistence failures at runtime use the record's
//! own error type and are not wrapped here.

use has_checksum_crypto::CryptoError;
use thiserror::Error;

/// Result type for declaration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by `has_checksum` / `has_signature`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The declaration's options or fields are unusable.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The algorithm identifier did not resolve.
    #[error("unknown algorithm '{identifier}'")]
    UnknownAlgorithm { identifier: String },

    /// The accessor maps to a column that cannot be written.
    #[error("column '{method}' has no writer to store the computed value")]
    MissingSetter { method: String },
}

impl Error {
    /// Returns true for [`Error::Configuration`].
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Invalid declaration configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Neither fields nor options were given.
    #[error("config required")]
    ConfigRequired,

    /// Options were given but no fields.
    #[error("no column(s) specified")]
    NoFields,

    /// A signature was declared without a key.
    #[error("key option required to calculate a signature")]
    KeyRequired,

    /// The signature key names a field or method the type does not have.
    #[error("key option refers to an unknown method '{0}'")]
    UnknownKeyField(String),

    /// A source field does not exist on the type.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// The output format name did not resolve.
    #[error("unknown format '{0}'")]
    UnknownFormat(String),

    /// A source field is listed more than once.
    #[error("field '{0}' is listed more than once")]
    DuplicateField(String),
}

impl From<CryptoError> for Error {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::UnknownAlgorithm(identifier) => Self::UnknownAlgorithm { identifier },
            CryptoError::UnknownFormat(name) => {
                Self::Configuration(ConfigurationError::UnknownFormat(name))
            }
        }
    }
}
