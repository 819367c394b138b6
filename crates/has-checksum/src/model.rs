//! Capabilities a target type exposes to declarations.

use crate::FieldValue;
use crate::binder::Digests;
use has_checksum_crypto::DigestValue;

/// A type whose fields can feed a checksum or signature.
///
/// `responds_to` is checked once per declaration, so it describes the type,
/// not a particular instance.
///
/// # Example
///
/// ```
/// use has_checksum::{FieldValue, Model};
///
/// struct User {
///     username: String,
///     age: Option<u32>,
/// }
///
/// impl Model for User {
///     fn responds_to(name: &str) -> bool {
///         matches!(name, "username" | "age")
///     }
///
///     fn read(&self, name: &str) -> Option<FieldValue> {
///         match name {
///             "username" => Some(self.username.as_str().into()),
///             "age" => Some(self.age.into()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Model {
    /// Returns true if `name` is a readable field or method on this type.
    fn responds_to(name: &str) -> bool;

    /// Reads the current value of `name`, or `None` if there is no such reader.
    fn read(&self, name: &str) -> Option<FieldValue>;
}

/// A [`Model`] with a process-wide registry of declared digests.
///
/// This is the instance-side entry point: declare once into a `static`
/// registry, then call [`digest`](Self::digest) on any instance.
pub trait HasDigests: Model + Sized + 'static {
    /// The registry holding this type's declarations.
    fn digests() -> &'static Digests<Self>;

    /// Computes (or reads the stored value of) the accessor named `method`.
    fn digest(&self, method: &str) -> Option<DigestValue> {
        Self::digests().value(self, method)
    }

    /// Returns true if `method` is a declared accessor.
    fn has_digest(method: &str) -> bool {
        Self::digests().responds_to(method)
    }
}
