//! Stored checksums and signatures for persisted records.
//!
//! When a declaration's accessor name is also a column, the value is written
//! to that column after the record is created and rewritten after any update
//! that touched a watched field. Otherwise the declaration behaves exactly
//! like a plain [`Digests`] one.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use has_checksum_config::HasChecksumConfig;

use crate::binder::{Accessor, Digests};
use crate::declaration::{Declaration, DigestKind};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::record::{Callbacks, PersistableRecord};

/// Declarations for a [`PersistableRecord`] type, plus the hooks that keep
/// stored digests current.
///
/// Hand [`callbacks`](Self::callbacks) (or the second half of
/// [`into_parts`](Self::into_parts)) to the record's save pipeline.
pub struct RecordDigests<R: PersistableRecord> {
    digests: Digests<R>,
    callbacks: Callbacks<R>,
}

impl<R: PersistableRecord> fmt::Debug for RecordDigests<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDigests")
            .field("digests", &self.digests)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

impl<R: PersistableRecord + 'static> Default for RecordDigests<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: PersistableRecord + 'static> RecordDigests<R> {
    pub fn new() -> Self {
        Self::with_config(&HasChecksumConfig::default())
    }

    pub fn with_config(config: &HasChecksumConfig) -> Self {
        Self {
            digests: Digests::with_config(config),
            callbacks: Callbacks::new(),
        }
    }

    /// Declares a checksum over `fields`, stored if the accessor is a column.
    ///
    /// # Errors
    ///
    /// As [`Digests::has_checksum`], and [`Error::MissingSetter`] if the
    /// accessor is a column that cannot be written.
    pub fn has_checksum<I, S>(&mut self, fields: I, options: Options) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declare(DigestKind::Checksum, fields, options)
    }

    /// Declares a signature over `fields`, stored if the accessor is a column.
    ///
    /// # Errors
    ///
    /// As [`Digests::has_signature`], and [`Error::MissingSetter`] if the
    /// accessor is a column that cannot be written.
    pub fn has_signature<I, S>(&mut self, fields: I, options: Options) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declare(DigestKind::Signature, fields, options)
    }

    pub fn digests(&self) -> &Digests<R> {
        &self.digests
    }

    pub fn callbacks(&self) -> &Callbacks<R> {
        &self.callbacks
    }

    pub fn into_parts(self) -> (Digests<R>, Callbacks<R>) {
        (self.digests, self.callbacks)
    }

    fn declare<I, S>(&mut self, kind: DigestKind, fields: I, options: Options) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resolves = |name: &str| R::responds_to(name) || R::has_column(name);
        let declaration = self.digests.configure(kind, fields, options, &resolves)?;

        if !R::has_column(&declaration.method) {
            self.digests.bind(declaration);
            return Ok(self);
        }

        if !R::has_writer(&declaration.method) {
            return Err(Error::MissingSetter {
                method: declaration.method,
            });
        }

        self.store(declaration);
        Ok(self)
    }

    fn store(&mut self, declaration: Declaration) {
        let Declaration {
            kind,
            method,
            calculator,
        } = declaration;

        let calculator = Arc::new(calculator);
        if !self
            .digests
            .insert(method.clone(), kind, Accessor::Stored(Arc::clone(&calculator)))
        {
            tracing::debug!(%method, %kind, "stored accessor already declared, skipping");
            return;
        }

        let mut watched: BTreeSet<String> = calculator.fields().iter().cloned().collect();
        if let Some(key) = calculator.key_field().filter(|name| R::has_column(name)) {
            watched.insert(key.to_string());
        }

        tracing::debug!(
            %method,
            %kind,
            fields = %calculator.fields(),
            watched = ?watched,
            "declared stored accessor"
        );

        let on_create = Arc::clone(&calculator);
        let column = method.clone();
        self.callbacks.after_create(move |record: &mut R| {
            let value = on_create.compute(record);
            tracing::trace!(method = %column, "storing digest after create");
            record.update_column(&column, value.into())
        });

        self.callbacks.around_update(move |record: &mut R, write| {
            let changed = record.changed_fields();
            let recompute = watched.iter().any(|name| changed.contains(name));

            write(record)?;

            if recompute {
                let value = calculator.compute(record);
                tracing::trace!(%method, "watched field changed, storing digest");
                record.update_column(&method, value.into())?;
            }
            Ok(())
        });
    }
}
