//! Declaration options.

use std::fmt;
use std::sync::Arc;

use has_checksum_crypto::Format;

/// A caller-supplied calculation that replaces hashing entirely.
pub type Transform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// A zero-argument function producing a signature key.
pub type KeyFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Either a named digest or a transform of the concatenated input.
#[derive(Clone)]
pub enum AlgorithmSpec {
    /// Resolved against the checksum or signature namespace.
    Named(String),
    /// Applied to the concatenated input; format and key are ignored.
    Transform(Transform),
}

impl fmt::Debug for AlgorithmSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}

impl From<&str> for AlgorithmSpec {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for AlgorithmSpec {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

/// Where a signature key comes from. Field and function keys are evaluated on
/// every call.
#[derive(Clone)]
pub enum KeySpec {
    /// Used as-is.
    Literal(String),
    /// Read from the instance through [`Model::read`](crate::Model::read).
    Field(String),
    /// Called for each signature.
    Function(KeyFn),
}

impl KeySpec {
    /// The field name, for [`KeySpec::Field`].
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Field(name) => Some(name),
            Self::Literal(_) | Self::Function(_) => None,
        }
    }
}

impl fmt::Debug for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Key material stays out of logs.
            Self::Literal(_) => f.write_str("Literal(..)"),
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Output format, either typed or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FormatSpec {
    Typed(Format),
    Named(String),
}

/// Options for `has_checksum` / `has_signature`.
///
/// Unset options fall back to the registry's defaults (`sha256`, hex).
///
/// ```
/// use has_checksum::{Format, Options};
///
/// let options = Options::new()
///     .algorithm("md5")
///     .format(Format::Base64)
///     .method("created_at_checksum");
/// # let _ = options;
///
/// let signed = Options::new().key("secret").method("username_signature");
/// # let _ = signed;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub(crate) algorithm: Option<AlgorithmSpec>,
    pub(crate) format: Option<FormatSpec>,
    pub(crate) method: Option<String>,
    pub(crate) key: Option<KeySpec>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the digest algorithm (`"sha256"`, `"md5"`, ...).
    pub fn algorithm(mut self, algorithm: impl Into<AlgorithmSpec>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    /// Replaces hashing with `transform` applied to the concatenated input.
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.algorithm = Some(AlgorithmSpec::Transform(Arc::new(transform)));
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(FormatSpec::Typed(format));
        self
    }

    /// Sets the format by name; an unknown name fails the declaration.
    pub fn format_name(mut self, name: impl Into<String>) -> Self {
        self.format = Some(FormatSpec::Named(name.into()));
        self
    }

    /// Overrides the accessor name.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Signs with a fixed key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(KeySpec::Literal(key.into()));
        self
    }

    /// Signs with the value of a field or method, read on each call.
    pub fn key_field(mut self, field: impl Into<String>) -> Self {
        self.key = Some(KeySpec::Field(field.into()));
        self
    }

    /// Signs with the output of `key`, called on each call.
    pub fn key_fn<F>(mut self, key: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.key = Some(KeySpec::Function(Arc::new(key)));
        self
    }

    /// True when no option has been set.
    pub fn is_unset(&self) -> bool {
        self.algorithm.is_none()
            && self.format.is_none()
            && self.method.is_none()
            && self.key.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_unset() {
        assert!(Options::new().is_unset());
        assert!(!Options::new().method("m").is_unset());
        assert!(!Options::new().format(Format::Hex).is_unset());
    }

    #[test]
    fn later_algorithm_wins() {
        let options = Options::new().transform(|v| v.to_string()).algorithm("md5");
        assert!(matches!(options.algorithm, Some(AlgorithmSpec::Named(ref n)) if n == "md5"));
    }

    #[test]
    fn debug_hides_key_material() {
        let options = Options::new().key("super-secret");
        let rendered = format!("{options:?}");
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn key_field_name() {
        assert_eq!(KeySpec::Field("updated_at".into()).field(), Some("updated_at"));
        assert_eq!(KeySpec::Literal("k".into()).field(), None);
    }
}
