//! Declaration defaults for has-checksum
//!
//! Provides hierarchical loading of the algorithm and format used when a
//! declaration leaves them unset:
//! 1. Environment variables, only when a prefix is given (highest precedence)
//! 2. has_checksum.local.toml (gitignored, local overrides)
//! 3. has_checksum.toml (git-tracked, project config)
//! 4. ~/.config/has-checksum/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)
//!
//! Loading is opt-in. The declaration API never reads files or the
//! environment itself.
//!
//! ```toml
//! [checksum]
//! algorithm = "md5"
//! format = "base64"
//!
//! [signature]
//! algorithm = "sha512"
//! ```

use std::fs;
use std::path::Path;

use anyhow::Result;
use has_checksum_crypto::{Format, resolve_checksum_algorithm, resolve_signature_algorithm};
use serde::{Deserialize, Serialize};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Default algorithm name for both checksums and signatures.
pub const DEFAULT_ALGORITHM: &str = "sha256";

/// Top-level has-checksum configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HasChecksumConfig {
    pub checksum: DigestDefaults,
    pub signature: DigestDefaults,
}

/// Algorithm and output format applied when a declaration omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestDefaults {
    pub algorithm: String,
    pub format: Format,
}

impl Default for DigestDefaults {
    fn default() -> Self {
        Self {
            algorithm: DEFAULT_ALGORITHM.to_string(),
            format: Format::Hex,
        }
    }
}

impl HasChecksumConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Parse a single TOML file without merging other sources
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that both default algorithms resolve.
    ///
    /// Signatures always render hex or binary, so a checksum-only signature
    /// format is accepted and narrowed at declaration time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        resolve_checksum_algorithm(&self.checksum.algorithm)
            .map_err(|source| ConfigError::InvalidAlgorithm {
                section: "checksum",
                source,
            })?;
        resolve_signature_algorithm(&self.signature.algorithm)
            .map_err(|source| ConfigError::InvalidAlgorithm {
                section: "signature",
                source,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = HasChecksumConfig::default();
        assert_eq!(config.checksum.algorithm, "sha256");
        assert_eq!(config.checksum.format, Format::Hex);
        assert_eq!(config.signature.algorithm, "sha256");
        assert_eq!(config.signature.format, Format::Hex);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: HasChecksumConfig = toml::from_str(
            r#"
[checksum]
format = "bubblebabble"
"#,
        )
        .unwrap();

        assert_eq!(config.checksum.algorithm, "sha256");
        assert_eq!(config.checksum.format, Format::Bubblebabble);
        assert_eq!(config.signature, DigestDefaults::default());
    }

    #[test]
    fn test_validate_rejects_unknown_algorithm() {
        let mut config = HasChecksumConfig::default();
        config.checksum.algorithm = "x".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidAlgorithm {
                section: "checksum",
                ..
            }
        ));
        assert!(err.to_string().contains("unknown algorithm 'x'"));
    }

    #[test]
    fn test_validate_uses_signature_namespace() {
        let mut config = HasChecksumConfig::default();
        config.signature.algorithm = "sha224".to_string();
        assert!(config.validate().is_ok());

        config.checksum.algorithm = "sha224".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("digests.toml");
        fs::write(
            &path,
            r#"
[signature]
algorithm = "md5"
format = "binary"
"#,
        )
        .expect("Failed to write config");

        let config = HasChecksumConfig::from_file(&path).expect("Failed to load config");
        assert_eq!(config.signature.algorithm, "md5");
        assert_eq!(config.signature.format, Format::Binary);
    }

    #[test]
    fn test_from_file_errors() {
        let temp_dir = tempdir().expect("Failed to create temp dir");

        let missing = HasChecksumConfig::from_file(temp_dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::ReadError { .. })));

        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "[checksum\nformat = ").expect("Failed to write config");
        let broken = HasChecksumConfig::from_file(&path);
        assert!(matches!(broken, Err(ConfigError::ParseError { .. })));
    }
}
