//! In-memory record storage.
//!
//! [`MemoryTable`] is a minimal save pipeline for [`PersistableRecord`]s: it
//! assigns ids, stamps timestamps, and runs the create and update hooks a
//! [`RecordDigests`](crate::RecordDigests) installs. Rows are kept as
//! [`Attributes`] images keyed by id.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::FieldValue;
use crate::record::{Callbacks, PersistableRecord};

/// Column `id`, assigned on create.
pub const ID: &str = "id";
/// Column stamped once on create, if the record has it.
pub const CREATED_AT: &str = "created_at";
/// Column stamped on create and on every update that changed something.
pub const UPDATED_AT: &str = "updated_at";

/// Errors raised by [`MemoryTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("write rejected for row {id}")]
    WriteFailed { id: u64 },

    #[error("row {0} not found")]
    RowNotFound(u64),

    #[error("record has not been created")]
    NotPersisted,

    #[error("unknown column '{0}'")]
    UnknownColumn(String),
}

/// Column values with dirty tracking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    values: BTreeMap<String, FieldValue>,
    changed: BTreeSet<String>,
}

impl Attributes {
    /// Creates attributes with every column set to `Null`.
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: columns
                .into_iter()
                .map(|name| (name.into(), FieldValue::Null))
                .collect(),
            changed: BTreeSet::new(),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Assigns a value, marking the column changed if the value differs.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        if self.values.get(name) == Some(&value) {
            return;
        }
        self.changed.insert(name.to_string());
        self.values.insert(name.to_string(), value);
    }

    /// Writes an existing column without marking it changed.
    ///
    /// # Errors
    ///
    /// [`MemoryError::UnknownColumn`] if there is no such column.
    pub fn write_column(&mut self, name: &str, value: FieldValue) -> Result<(), MemoryError> {
        let slot = self
            .values
            .get_mut(name)
            .ok_or_else(|| MemoryError::UnknownColumn(name.to_string()))?;
        *slot = value;
        Ok(())
    }

    /// Columns assigned since the last save.
    pub fn changed(&self) -> &BTreeSet<String> {
        &self.changed
    }

    pub fn clear_changes(&mut self) {
        self.changed.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// A copy of the values with no dirty state.
    fn image(&self) -> Self {
        Self {
            values: self.values.clone(),
            changed: BTreeSet::new(),
        }
    }
}

/// A record whose columns live in an [`Attributes`].
pub trait Row: PersistableRecord<Error = MemoryError> {
    fn attributes(&self) -> &Attributes;
    fn attributes_mut(&mut self) -> &mut Attributes;

    /// The id assigned on create.
    fn id(&self) -> Option<u64> {
        match self.attributes().get(ID)? {
            FieldValue::UInt(id) => Some(*id),
            _ => None,
        }
    }
}

/// Source of timestamps for `created_at` / `updated_at`.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc>,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// An in-memory table driving a record type's save hooks.
pub struct MemoryTable<R: Row> {
    callbacks: Callbacks<R>,
    rows: BTreeMap<u64, Attributes>,
    next_id: u64,
    clock: Box<dyn Clock + Send + Sync>,
    fail_writes: bool,
}

impl<R: Row> fmt::Debug for MemoryTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTable")
            .field("callbacks", &self.callbacks)
            .field("rows", &self.rows.len())
            .field("next_id", &self.next_id)
            .field("fail_writes", &self.fail_writes)
            .finish_non_exhaustive()
    }
}

impl<R: Row + 'static> MemoryTable<R> {
    /// Creates an empty table whose saves run `callbacks`.
    pub fn new(callbacks: Callbacks<R>) -> Self {
        Self {
            callbacks,
            rows: BTreeMap::new(),
            next_id: 1,
            clock: Box::new(SystemClock),
            fail_writes: false,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Makes every subsequent row write fail with [`MemoryError::WriteFailed`].
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Inserts `record`, then runs the after-create hooks.
    ///
    /// If the row write fails the record's id and timestamps are restored, so
    /// the record is still not persisted.
    ///
    /// # Errors
    ///
    /// Returns the write error, or the first hook error.
    pub fn create(&mut self, record: &mut R) -> Result<u64, MemoryError> {
        let id = self.next_id;
        let now = self.clock.now();
        let unsaved = record.attributes().clone();

        let attributes = record.attributes_mut();
        attributes.set(ID, id);
        for column in [CREATED_AT, UPDATED_AT] {
            if R::has_column(column) && attributes.get(column).is_none_or(FieldValue::is_null) {
                attributes.set(column, now);
            }
        }

        if let Err(err) = write_row(&mut self.rows, self.fail_writes, id, record) {
            *record.attributes_mut() = unsaved;
            return Err(err);
        }
        self.next_id += 1;
        tracing::trace!(id, "row created");

        self.callbacks.run_after_create(record)?;
        self.sync(id, record);
        Ok(id)
    }

    /// Saves changes to an existing `record`, wrapped by the around-update
    /// hooks.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::NotPersisted`] or [`MemoryError::RowNotFound`]
    /// for a record that was never created, otherwise the write or hook error.
    pub fn update(&mut self, record: &mut R) -> Result<(), MemoryError> {
        let id = record.id().ok_or(MemoryError::NotPersisted)?;
        if !self.rows.contains_key(&id) {
            return Err(MemoryError::RowNotFound(id));
        }

        if R::has_column(UPDATED_AT) && !record.attributes().changed().is_empty() {
            let now = self.clock.now();
            record.attributes_mut().set(UPDATED_AT, now);
        }

        let Self {
            callbacks,
            rows,
            fail_writes,
            ..
        } = self;
        callbacks.run_update(record, |record| write_row(rows, *fail_writes, id, record))?;
        tracing::trace!(id, "row updated");

        self.sync(id, record);
        Ok(())
    }

    /// Reads a column from the stored row.
    pub fn select_value(&self, id: u64, column: &str) -> Option<&FieldValue> {
        self.rows.get(&id)?.get(column)
    }

    pub fn find(&self, id: u64) -> Option<&Attributes> {
        self.rows.get(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copies direct column writes into the stored row and clears dirty state.
    fn sync(&mut self, id: u64, record: &mut R) {
        self.rows.insert(id, record.attributes().image());
        record.attributes_mut().clear_changes();
    }
}

fn write_row<R: Row>(
    rows: &mut BTreeMap<u64, Attributes>,
    fail: bool,
    id: u64,
    record: &R,
) -> Result<(), MemoryError> {
    if fail {
        return Err(MemoryError::WriteFailed { id });
    }
    rows.insert(id, record.attributes().image());
    Ok(())
}
