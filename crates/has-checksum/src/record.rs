//! Persistence collaborator traits and hook lists.

use std::collections::BTreeSet;
use std::fmt;

use crate::{FieldValue, Model};

/// A [`Model`] backed by persisted columns.
///
/// Implementing this trait opts a type into stored checksums and signatures
/// through [`RecordDigests`](crate::RecordDigests).
pub trait PersistableRecord: Model {
    /// Error raised by the persistence layer.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns true if `name` is a persisted column.
    fn has_column(name: &str) -> bool;

    /// Returns true if column `name` can be written.
    fn has_writer(name: &str) -> bool;

    /// Names of the fields changed since the record was loaded or last saved.
    fn changed_fields(&self) -> BTreeSet<String>;

    /// Writes `value` straight to column `name` without running save hooks.
    ///
    /// # Errors
    ///
    /// Returns the persistence layer's error if the write fails.
    fn update_column(&mut self, name: &str, value: FieldValue) -> Result<(), Self::Error>;
}

/// The write an around-update hook wraps.
pub type Write<'a, R> =
    &'a mut dyn FnMut(&mut R) -> Result<(), <R as PersistableRecord>::Error>;

type AfterCreateHook<R> =
    Box<dyn Fn(&mut R) -> Result<(), <R as PersistableRecord>::Error> + Send + Sync>;

type AroundUpdateHook<R> = Box<
    dyn Fn(&mut R, Write<'_, R>) -> Result<(), <R as PersistableRecord>::Error> + Send + Sync,
>;

/// Ordered hook lists for one record type's save pipeline.
///
/// After-create hooks run in registration order. Around-update hooks nest:
/// the first registered is outermost and the write runs innermost.
pub struct Callbacks<R: PersistableRecord> {
    after_create: Vec<AfterCreateHook<R>>,
    around_update: Vec<AroundUpdateHook<R>>,
}

impl<R: PersistableRecord> Default for Callbacks<R> {
    fn default() -> Self {
        Self {
            after_create: Vec::new(),
            around_update: Vec::new(),
        }
    }
}

impl<R: PersistableRecord> fmt::Debug for Callbacks<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("after_create", &self.after_create.len())
            .field("around_update", &self.around_update.len())
            .finish()
    }
}

impl<R: PersistableRecord + 'static> Callbacks<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook to run after a record's first successful write.
    pub fn after_create<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut R) -> Result<(), R::Error> + Send + Sync + 'static,
    {
        self.after_create.push(Box::new(hook));
        self
    }

    /// Registers a hook around each update write. The hook must call the
    /// write it is given for the update to happen.
    pub fn around_update<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut R, Write<'_, R>) -> Result<(), R::Error> + Send + Sync + 'static,
    {
        self.around_update.push(Box::new(hook));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.after_create.is_empty() && self.around_update.is_empty()
    }

    /// Runs every after-create hook, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first hook error.
    pub fn run_after_create(&self, record: &mut R) -> Result<(), R::Error> {
        for hook in &self.after_create {
            hook(record)?;
        }
        Ok(())
    }

    /// Runs `write` wrapped by every around-update hook.
    ///
    /// # Errors
    ///
    /// Returns the error of the write or of any hook, unchanged.
    pub fn run_update<W>(&self, record: &mut R, mut write: W) -> Result<(), R::Error>
    where
        W: FnMut(&mut R) -> Result<(), R::Error>,
    {
        wrap(&self.around_update, record, &mut write)
    }
}

fn wrap<R: PersistableRecord>(
    hooks: &[AroundUpdateHook<R>],
    record: &mut R,
    write: Write<'_, R>,
) -> Result<(), R::Error> {
    match hooks.split_first() {
        None => write(record),
        Some((hook, inner)) => {
            hook(record, &mut |record: &mut R| wrap(inner, record, &mut *write))
        }
    }
}
