//! # has-checksum
//!
//! Declarative checksums and signatures computed from a type's fields.
//!
//! A type declares that an accessor yields a digest of some of its fields:
//! a checksum (plain hash) or a signature (HMAC with a key). Values are
//! computed from the fields' current values on each call. For persisted
//! records the value can instead be stored in a column and recomputed only
//! when a watched field changes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  has_checksum / has_signature                                    │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌───────────────┐  │
//! │  │ Options  │ → │ Resolver │ → │ Digests  │ → │ RecordDigests │  │
//! │  │(declare) │   │ (crypto) │   │(accessor)│   │   (hooks)     │  │
//! │  └──────────┘   └──────────┘   └──────────┘   └───────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Declarations are validated and resolved once. Accessors never fail.
//!
//! # Quick Start
//!
//! ```
//! use has_checksum::{Digests, FieldValue, Format, Model, Options};
//!
//! struct User {
//!     username: String,
//!     age: u32,
//! }
//!
//! impl Model for User {
//!     fn responds_to(name: &str) -> bool {
//!         matches!(name, "username" | "age")
//!     }
//!
//!     fn read(&self, name: &str) -> Option<FieldValue> {
//!         match name {
//!             "username" => Some(self.username.as_str().into()),
//!             "age" => Some(self.age.into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut digests = Digests::<User>::new();
//! digests
//!     .has_checksum(["age", "username"], Options::new().algorithm("md5"))?
//!     .has_signature(["username"], Options::new().key("xxx").format(Format::Hex))?;
//!
//! let user = User { username: "sshaw".into(), age: 10 };
//! assert_eq!(
//!     digests.value(&user, "age_username_checksum").unwrap(),
//!     "8e2cfd18c76a08f4dbe2eaf0adf24007"
//! );
//! assert_eq!(
//!     digests.value(&user, "username_signature").unwrap(),
//!     "d61d500cf25a707858515d43b24602fa91e2ce400b2814630f13387f6bd86a0c"
//! );
//! # Ok::<(), has_checksum::Error>(())
//! ```
//!
//! # Modules
//!
//! - **Declaration**: [`Digests`], [`RecordDigests`], [`Options`]
//! - **Collaborators**: [`Model`], [`PersistableRecord`], [`Callbacks`]
//! - **Storage**: [`memory`] for an in-process save pipeline

mod binder;
mod declaration;
mod error;
pub mod memory;
mod model;
mod options;
mod persistence;
mod reader;
mod record;
mod value;

pub use binder::Digests;
pub use declaration::{Calculator, DigestKind};
pub use error::{ConfigurationError, Error, Result};
pub use model::{HasDigests, Model};
pub use options::{AlgorithmSpec, KeyFn, KeySpec, Options, Transform};
pub use persistence::RecordDigests;
pub use reader::{FieldSpec, read_fields};
pub use record::{Callbacks, PersistableRecord, Write};
pub use value::FieldValue;

// Re-export the resolver surface
pub use has_checksum_crypto::{
    ChecksumAlgorithm, DigestValue, Format, SignatureAlgorithm, resolve_checksum_algorithm,
    resolve_signature_algorithm,
};

// Re-export configuration
pub use has_checksum_config::{ConfigLoader, DigestDefaults, HasChecksumConfig};
