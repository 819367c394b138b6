//! Declaration-time validation and resolution.
//!
//! Everything that can be wrong with a declaration is detected here, once.
//! The resulting [`Calculator`] cannot fail when it runs.

use std::fmt::{self, Display};

use has_checksum_config::HasChecksumConfig;
use has_checksum_crypto::{
    ChecksumAlgorithm, DigestValue, Format, SignatureAlgorithm, resolve_checksum_algorithm,
    resolve_signature_algorithm,
};

use crate::error::{ConfigurationError, Result};
use crate::options::{AlgorithmSpec, FormatSpec, KeySpec, Options, Transform};
use crate::reader::{FieldSpec, read_fields};
use crate::Model;

/// Which entry point made a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestKind {
    Checksum,
    Signature,
}

impl DigestKind {
    /// Suffix of default accessor names.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Checksum => "checksum",
            Self::Signature => "signature",
        }
    }
}

impl Display for DigestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// The resolved computation behind one accessor.
#[derive(Clone)]
pub(crate) enum Calculation {
    /// The key is never used to compute, but a key field still counts as
    /// watched when the value is stored.
    Transform {
        transform: Transform,
        key: Option<KeySpec>,
    },
    Checksum {
        algorithm: ChecksumAlgorithm,
        format: Format,
    },
    Signature {
        algorithm: SignatureAlgorithm,
        format: Format,
        key: KeySpec,
    },
}

impl fmt::Debug for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transform { key, .. } => f
                .debug_struct("Transform")
                .field("key", key)
                .finish_non_exhaustive(),
            Self::Checksum { algorithm, format } => f
                .debug_struct("Checksum")
                .field("algorithm", algorithm)
                .field("format", format)
                .finish(),
            Self::Signature {
                algorithm,
                format,
                key,
            } => f
                .debug_struct("Signature")
                .field("algorithm", algorithm)
                .field("format", format)
                .field("key", key)
                .finish(),
        }
    }
}

/// Computes a declaration's value from an instance's current fields.
#[derive(Debug, Clone)]
pub struct Calculator {
    fields: FieldSpec,
    calculation: Calculation,
}

impl Calculator {
    pub fn fields(&self) -> &FieldSpec {
        &self.fields
    }

    /// The signature key's field name, if the key is read from the instance.
    pub fn key_field(&self) -> Option<&str> {
        match &self.calculation {
            Calculation::Signature { key, .. } => key.field(),
            Calculation::Transform { key, .. } => key.as_ref().and_then(KeySpec::field),
            Calculation::Checksum { .. } => None,
        }
    }

    /// Reads the fields and computes the digest.
    pub fn compute<M: Model>(&self, model: &M) -> DigestValue {
        let input = read_fields(model, &self.fields);
        match &self.calculation {
            Calculation::Transform { transform, .. } => {
                let text = String::from_utf8_lossy(&input);
                DigestValue::Text(transform(&*text))
            }
            Calculation::Checksum { algorithm, format } => algorithm.checksum(&input, *format),
            Calculation::Signature {
                algorithm,
                format,
                key,
            } => {
                let key = resolve_key(model, key);
                algorithm.sign(&key, &input, *format)
            }
        }
    }
}

fn resolve_key<M: Model>(model: &M, key: &KeySpec) -> Vec<u8> {
    match key {
        KeySpec::Literal(value) => value.clone().into_bytes(),
        KeySpec::Field(name) => model
            .read(name)
            .map(|value| value.canonical_bytes())
            .unwrap_or_default(),
        KeySpec::Function(key) => key().into_bytes(),
    }
}

/// A validated declaration, ready to be bound.
#[derive(Debug, Clone)]
pub(crate) struct Declaration {
    pub(crate) kind: DigestKind,
    pub(crate) method: String,
    pub(crate) calculator: Calculator,
}

/// Validates a declaration against a type and resolves its algorithm.
///
/// `resolves` answers whether a field or method name exists on the target.
/// Checks run in this order: presence of fields, field names, signature key,
/// algorithm, format.
pub(crate) fn configure<I, S>(
    kind: DigestKind,
    fields: I,
    options: Options,
    defaults: &HasChecksumConfig,
    resolves: &dyn Fn(&str) -> bool,
) -> Result<Declaration>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names: Vec<String> = fields.into_iter().map(Into::into).collect();
    if names.is_empty() {
        return Err(if options.is_unset() {
            ConfigurationError::ConfigRequired
        } else {
            ConfigurationError::NoFields
        }
        .into());
    }

    let fields = FieldSpec::new(names)?;
    if let Some(unknown) = fields.iter().find(|name| !resolves(name)) {
        return Err(ConfigurationError::UnknownField(unknown.clone()).into());
    }

    let Options {
        algorithm,
        format,
        method,
        key,
    } = options;

    let key = match kind {
        DigestKind::Signature => {
            let key = key.ok_or(ConfigurationError::KeyRequired)?;
            if let Some(name) = key.field() {
                if !resolves(name) {
                    return Err(ConfigurationError::UnknownKeyField(name.to_string()).into());
                }
            }
            Some(key)
        }
        DigestKind::Checksum => {
            if key.is_some() {
                tracing::debug!(fields = %fields, "key option ignored for checksum");
            }
            None
        }
    };

    let defaults = match kind {
        DigestKind::Checksum => &defaults.checksum,
        DigestKind::Signature => &defaults.signature,
    };

    let algorithm = algorithm.unwrap_or_else(|| AlgorithmSpec::Named(defaults.algorithm.clone()));
    let format = match format {
        None => defaults.format,
        Some(FormatSpec::Typed(format)) => format,
        Some(FormatSpec::Named(name)) => Format::parse(&name)?,
    };

    let calculation = match (algorithm, key) {
        (AlgorithmSpec::Transform(transform), key) => Calculation::Transform { transform, key },
        (AlgorithmSpec::Named(name), None) => Calculation::Checksum {
            algorithm: resolve_checksum_algorithm(&name)?,
            format,
        },
        (AlgorithmSpec::Named(name), Some(key)) => {
            let algorithm = resolve_signature_algorithm(&name)?;
            if format.for_signature() != format {
                tracing::debug!(%format, "signature format falls back to hex");
            }
            Calculation::Signature {
                algorithm,
                format: format.for_signature(),
                key,
            }
        }
    };

    let method = method.unwrap_or_else(|| format!("{}_{}", fields.joined(), kind.suffix()));

    Ok(Declaration {
        kind,
        method,
        calculator: Calculator {
            fields,
            calculation,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn any_field(name: &str) -> bool {
        matches!(name, "username" | "created_at" | "age" | "key_method")
    }

    fn checksum(fields: &[&str], options: Options) -> Result<Declaration> {
        configure(
            DigestKind::Checksum,
            fields.iter().copied(),
            options,
            &HasChecksumConfig::default(),
            &any_field,
        )
    }

    fn signature(fields: &[&str], options: Options) -> Result<Declaration> {
        configure(
            DigestKind::Signature,
            fields.iter().copied(),
            options,
            &HasChecksumConfig::default(),
            &any_field,
        )
    }

    #[test]
    fn nothing_given_requires_config() {
        let err = checksum(&[], Options::new()).unwrap_err();
        assert_eq!(err, Error::Configuration(ConfigurationError::ConfigRequired));
        assert_eq!(err.to_string(), "config required");
    }

    #[test]
    fn options_without_fields() {
        let err = checksum(&[], Options::new().method("x")).unwrap_err();
        assert_eq!(err.to_string(), "no column(s) specified");
    }

    #[test]
    fn default_method_names() {
        let decl = checksum(&["username", "created_at"], Options::new()).unwrap();
        assert_eq!(decl.method, "username_created_at_checksum");
        assert_eq!(decl.kind, DigestKind::Checksum);

        let decl = signature(&["username"], Options::new().key("xxx")).unwrap();
        assert_eq!(decl.method, "username_signature");
    }

    #[test]
    fn defaults_to_sha256_hex() {
        let decl = checksum(&["username"], Options::new()).unwrap();
        assert!(matches!(
            decl.calculator.calculation,
            Calculation::Checksum {
                algorithm: ChecksumAlgorithm::Sha256,
                format: Format::Hex
            }
        ));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = checksum(&["username", "nope"], Options::new()).unwrap_err();
        assert_eq!(
            err,
            Error::Configuration(ConfigurationError::UnknownField("nope".into()))
        );
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let err = checksum(&["age"], Options::new().algorithm("x")).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownAlgorithm {
                identifier: "x".into()
            }
        );
        assert_eq!(err.to_string(), "unknown algorithm 'x'");
    }

    #[test]
    fn signature_requires_key() {
        let err = signature(&["age"], Options::new()).unwrap_err();
        assert_eq!(err.to_string(), "key option required to calculate a signature");
        assert!(err.is_configuration());
    }

    #[test]
    fn signature_key_field_must_exist() {
        let err = signature(&["age"], Options::new().key_field("missing")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "key option refers to an unknown method 'missing'"
        );
        assert!(signature(&["age"], Options::new().key_field("key_method")).is_ok());
    }

    #[test]
    fn signature_checks_key_before_algorithm() {
        let err = signature(&["age"], Options::new().algorithm("y")).unwrap_err();
        assert_eq!(err, Error::Configuration(ConfigurationError::KeyRequired));

        let err = signature(&["age"], Options::new().key("x").algorithm("y")).unwrap_err();
        assert_eq!(err.to_string(), "unknown algorithm 'y'");
    }

    #[test]
    fn signature_namespace_differs_from_checksum() {
        assert!(signature(&["age"], Options::new().key("k").algorithm("sha224")).is_ok());
        assert!(checksum(&["age"], Options::new().algorithm("sha224")).is_err());
    }

    #[test]
    fn signature_format_narrows_to_hex() {
        let decl = signature(&["age"], Options::new().key("k").format(Format::Base64)).unwrap();
        assert!(matches!(
            decl.calculator.calculation,
            Calculation::Signature {
                format: Format::Hex,
                ..
            }
        ));
    }

    #[test]
    fn format_by_name() {
        let decl = checksum(&["age"], Options::new().format_name("BASE64")).unwrap();
        assert!(matches!(
            decl.calculator.calculation,
            Calculation::Checksum {
                format: Format::Base64,
                ..
            }
        ));

        let err = checksum(&["age"], Options::new().format_name("octal")).unwrap_err();
        assert_eq!(
            err,
            Error::Configuration(ConfigurationError::UnknownFormat("octal".into()))
        );
    }

    #[test]
    fn transform_skips_resolution() {
        let decl = checksum(&["age"], Options::new().transform(|v| v.to_uppercase())).unwrap();
        assert!(matches!(decl.calculator.calculation, Calculation::Transform { .. }));
    }

    #[test]
    fn transform_signature_keeps_key_field() {
        let decl = signature(
            &["username"],
            Options::new()
                .key_field("key_method")
                .transform(|v| v.to_uppercase()),
        )
        .unwrap();
        assert_eq!(decl.calculator.key_field(), Some("key_method"));

        let decl = checksum(
            &["username"],
            Options::new().key_field("key_method").transform(|v| v.to_uppercase()),
        )
        .unwrap();
        assert_eq!(decl.calculator.key_field(), None);
    }

    #[test]
    fn configured_defaults_apply() {
        let mut defaults = HasChecksumConfig::default();
        defaults.checksum.algorithm = "md5".into();
        defaults.checksum.format = Format::Base64;

        let decl = configure(
            DigestKind::Checksum,
            ["age"],
            Options::new(),
            &defaults,
            &any_field,
        )
        .unwrap();
        assert!(matches!(
            decl.calculator.calculation,
            Calculation::Checksum {
                algorithm: ChecksumAlgorithm::Md5,
                format: Format::Base64
            }
        ));
    }

    #[test]
    fn checksum_ignores_key() {
        let decl = checksum(&["age"], Options::new().key("k")).unwrap();
        assert_eq!(decl.calculator.key_field(), None);
        assert!(matches!(decl.calculator.calculation, Calculation::Checksum { .. }));
    }
}
