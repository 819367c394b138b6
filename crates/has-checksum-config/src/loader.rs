//! Declaration defaults merged from files and, optionally, the environment.
//!
//! Nothing in `has-checksum` calls the loader on its own: `Digests::new()`
//! always starts from [`HasChecksumConfig::default`]. An application that
//! wants file-driven defaults loads them here and hands the result to
//! `Digests::with_config`.

use crate::{HasChecksumConfig, Paths};
use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use std::env;
use std::path::{Path, PathBuf};

/// Builder for a layered defaults load.
///
/// Sources, lowest precedence first:
///
/// 1. built-in defaults
/// 2. `~/.config/has-checksum/config.toml` (unless [`without_user_config`](Self::without_user_config))
/// 3. `has_checksum.toml` in the project directory
/// 4. `has_checksum.local.toml` in the project directory
/// 5. `<PREFIX>_CHECKSUM_ALGORITHM` style variables, only after
///    [`with_env_prefix`](Self::with_env_prefix)
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: Option<String>,
    user_config: bool,
}

impl ConfigLoader {
    /// A loader rooted at the current directory, with no environment source.
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: None,
            user_config: true,
        }
    }

    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Reads `<prefix>_CHECKSUM_*` and `<prefix>_SIGNATURE_*` variables last.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn without_user_config(mut self) -> Self {
        self.user_config = false;
        self
    }

    /// Merges every enabled source and validates the algorithm names.
    pub fn load(self) -> Result<HasChecksumConfig> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&HasChecksumConfig::default())?);

        if self.user_config {
            if let Ok(path) = Paths::new().user_config_file() {
                builder = add_file(builder, path);
            }
        }
        builder = add_file(builder, Paths::project_config_file(&self.project_dir));
        builder = add_file(builder, Paths::local_config_file(&self.project_dir));

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .separator("_")
                    .try_parsing(true),
            );
        }

        let loaded: HasChecksumConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .context("failed to read digest defaults")?;
        loaded.validate().context("invalid digest defaults")?;

        tracing::debug!(
            project_dir = %self.project_dir.display(),
            env_prefix = ?self.env_prefix,
            checksum_algorithm = %loaded.checksum.algorithm,
            checksum_format = %loaded.checksum.format,
            signature_algorithm = %loaded.signature.algorithm,
            signature_format = %loaded.signature.format,
            "loaded digest defaults"
        );

        Ok(loaded)
    }

    /// As [`load`](Self::load), falling back to built-in defaults on any error.
    pub fn load_or_default(self) -> HasChecksumConfig {
        self.load().unwrap_or_default()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn add_file(builder: ConfigBuilder<DefaultState>, path: PathBuf) -> ConfigBuilder<DefaultState> {
    if !path.exists() {
        return builder;
    }
    builder.add_source(File::from(path).required(false).format(FileFormat::Toml))
}
