//! The accessor registry.
//!
//! A [`Digests`] holds every checksum and signature declared for one type.
//! Accessors are looked up by name and computed against an instance:
//!
//! ```
//! use std::sync::LazyLock;
//! use has_checksum::{Digests, FieldValue, HasDigests, Model, Options};
//!
//! struct User {
//!     username: String,
//! }
//!
//! impl Model for User {
//!     fn responds_to(name: &str) -> bool {
//!         name == "username"
//!     }
//!
//!     fn read(&self, name: &str) -> Option<FieldValue> {
//!         (name == "username").then(|| self.username.as_str().into())
//!     }
//! }
//!
//! static DIGESTS: LazyLock<Digests<User>> = LazyLock::new(|| {
//!     let mut digests = Digests::new();
//!     digests
//!         .has_checksum(["username"], Options::new())
//!         .and_then(|d| d.has_signature(["username"], Options::new().key("xxx")))
//!         .expect("valid declarations");
//!     digests
//! });
//!
//! impl HasDigests for User {
//!     fn digests() -> &'static Digests<Self> {
//!         &DIGESTS
//!     }
//! }
//!
//! let user = User { username: "sshaw".into() };
//! assert_eq!(
//!     user.digest("username_checksum").unwrap(),
//!     "5b891e901f3c8859115dcdfe323944ec7b4abbde9f7b680430fca7d2c7af89e5"
//! );
//! assert!(User::has_digest("username_signature"));
//! assert!(user.digest("nope").is_none());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use has_checksum_config::HasChecksumConfig;
use has_checksum_crypto::DigestValue;

use crate::declaration::{Calculator, Declaration, DigestKind, configure};
use crate::error::Result;
use crate::options::Options;
use crate::Model;

/// How a declared accessor produces its value.
#[derive(Debug, Clone)]
pub(crate) enum Accessor {
    /// Computed from the current field values on every call.
    Computed(Arc<Calculator>),
    /// Backed by a column of the same name. The stored value wins once a
    /// persistence hook has written it.
    Stored(Arc<Calculator>),
}

impl Accessor {
    fn calculator(&self) -> &Calculator {
        match self {
            Self::Computed(calculator) | Self::Stored(calculator) => calculator,
        }
    }
}

/// Per-type registry of checksum and signature accessors.
///
/// Build it once (typically in a `LazyLock`), then share it. Declaring the
/// same accessor name twice keeps the first declaration.
pub struct Digests<M> {
    defaults: HasChecksumConfig,
    accessors: BTreeMap<String, Accessor>,
    kinds: BTreeMap<String, DigestKind>,
    _model: PhantomData<fn(&M)>,
}

impl<M> fmt::Debug for Digests<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Digests")
            .field("defaults", &self.defaults)
            .field("accessors", &self.accessors)
            .finish_non_exhaustive()
    }
}

impl<M: Model> Default for Digests<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Digests<M> {
    /// Creates an empty registry using the built-in defaults (`sha256`, hex).
    pub fn new() -> Self {
        Self::with_config(&HasChecksumConfig::default())
    }

    /// Creates an empty registry whose unset options fall back to `config`.
    pub fn with_config(config: &HasChecksumConfig) -> Self {
        Self {
            defaults: config.clone(),
            accessors: BTreeMap::new(),
            kinds: BTreeMap::new(),
            _model: PhantomData,
        }
    }

    /// Declares a checksum over `fields`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the fields or options are invalid,
    /// or [`Error::UnknownAlgorithm`](crate::Error::UnknownAlgorithm) if the
    /// algorithm name does not resolve.
    pub fn has_checksum<I, S>(&mut self, fields: I, options: Options) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let declaration = self.configure(DigestKind::Checksum, fields, options, &M::responds_to)?;
        self.bind(declaration);
        Ok(self)
    }

    /// Declares a keyed signature over `fields`.
    ///
    /// # Errors
    ///
    /// As [`has_checksum`](Self::has_checksum), and additionally if no key is
    /// given or the key names an unknown field.
    pub fn has_signature<I, S>(&mut self, fields: I, options: Options) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let declaration =
            self.configure(DigestKind::Signature, fields, options, &M::responds_to)?;
        self.bind(declaration);
        Ok(self)
    }

    /// Computes the accessor named `method` for `model`.
    ///
    /// Returns `None` if no such accessor was declared. Column-backed
    /// accessors return the stored value unless it is still `Null`.
    pub fn value(&self, model: &M, method: &str) -> Option<DigestValue> {
        let accessor = self.accessors.get(method)?;
        let value = match accessor {
            Accessor::Computed(calculator) => calculator.compute(model),
            Accessor::Stored(calculator) => model
                .read(method)
                .and_then(|stored| stored.to_digest())
                .unwrap_or_else(|| calculator.compute(model)),
        };
        Some(value)
    }

    /// Returns true if `method` was declared on this registry.
    pub fn responds_to(&self, method: &str) -> bool {
        self.accessors.contains_key(method)
    }

    /// The kind of the accessor named `method`.
    pub fn kind(&self, method: &str) -> Option<DigestKind> {
        self.kinds.get(method).copied()
    }

    /// The calculator behind `method`.
    pub fn calculator(&self, method: &str) -> Option<&Calculator> {
        self.accessors.get(method).map(Accessor::calculator)
    }

    /// Declared accessor names, sorted.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.accessors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    pub fn defaults(&self) -> &HasChecksumConfig {
        &self.defaults
    }

    pub(crate) fn configure<I, S>(
        &self,
        kind: DigestKind,
        fields: I,
        options: Options,
        resolves: &dyn Fn(&str) -> bool,
    ) -> Result<Declaration>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        configure(kind, fields, options, &self.defaults, resolves)
    }

    /// Installs a computed accessor unless the name is already taken.
    pub(crate) fn bind(&mut self, declaration: Declaration) {
        let Declaration {
            kind,
            method,
            calculator,
        } = declaration;

        if M::responds_to(&method) {
            tracing::debug!(%method, %kind, "type already has a reader with this name, skipping");
            return;
        }
        if self.responds_to(&method) {
            tracing::debug!(%method, %kind, "accessor already declared, skipping");
            return;
        }

        tracing::debug!(%method, %kind, fields = %calculator.fields(), "declared accessor");
        self.insert(method, kind, Accessor::Computed(Arc::new(calculator)));
    }

    /// Inserts an accessor, keeping an existing one of the same name.
    /// Returns false if the name was taken.
    pub(crate) fn insert(&mut self, method: String, kind: DigestKind, accessor: Accessor) -> bool {
        if self.accessors.contains_key(&method) {
            return false;
        }
        self.kinds.insert(method.clone(), kind);
        self.accessors.insert(method, accessor);
        true
    }
}
