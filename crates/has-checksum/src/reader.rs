//! Field lists and digest input assembly.

use std::fmt::{self, Display};

use crate::Model;
use crate::error::{ConfigurationError, Result};

/// The ordered, duplicate-free list of fields a declaration reads.
///
/// Order matters: it is the concatenation order of the digest input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec(Vec<String>);

impl FieldSpec {
    /// Builds a field list, rejecting empty lists and repeated names.
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if names.contains(&field) {
                return Err(ConfigurationError::DuplicateField(field).into());
            }
            names.push(field);
        }

        if names.is_empty() {
            return Err(ConfigurationError::NoFields.into());
        }

        Ok(Self(names))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|f| f == name)
    }

    /// Field names joined with `_`, the stem of default accessor names.
    pub fn joined(&self) -> String {
        self.0.join("_")
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a FieldSpec {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Concatenates the current values of `fields` on `model` into the exact
/// bytes fed to the digest.
///
/// Values are written in their canonical form and joined with no
/// separator. Missing readers render like `Null` (empty); declarations
/// validate field names up front, so that only happens if a `Model` impl
/// disagrees with its own `responds_to`.
pub fn read_fields<M: Model>(model: &M, fields: &FieldSpec) -> Vec<u8> {
    let mut input = Vec::new();
    for name in fields {
        if let Some(value) = model.read(name) {
            value.write_canonical(&mut input);
        }
    }
    input
}
