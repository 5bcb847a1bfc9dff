//! A single in-memory, insertion-ordered collection of records.
//!
//! Records are kept in a `Vec` behind a [`tokio::sync::RwLock`]; every
//! operation acquires the lock once and runs to completion, so concurrent
//! callers never observe a half-applied mutation. Lookups scan linearly by
//! id.

use tokio::sync::RwLock;

use crate::error::StoreError;

/// A record that can live in a [`Collection`].
pub trait Record: Clone + Send + Sync + 'static {
    /// The record's strongly-typed identifier.
    type Id: Copy + Eq + core::fmt::Display + Send + Sync;

    /// Entity kind name used in error messages and notifications.
    const KIND: &'static str;

    /// Return this record's id.
    fn id(&self) -> Self::Id;
}

/// An insertion-ordered collection of records keyed by id.
///
/// Ids are unique within a collection and stable for the lifetime of the
/// record. No ordering guarantee exists beyond insertion order for listing.
#[derive(Debug)]
pub struct Collection<T> {
    items: RwLock<Vec<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: RwLock::const_new(Vec::new()),
        }
    }
}

impl<T: Record> Collection<T> {
    /// Create an empty collection.
    pub const fn new() -> Self {
        Self {
            items: RwLock::const_new(Vec::new()),
        }
    }

    /// Create a collection pre-populated with `items`, preserving order.
    pub const fn with_items(items: Vec<T>) -> Self {
        Self {
            items: RwLock::const_new(items),
        }
    }

    /// Return all records in insertion order.
    pub async fn list(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    /// Return the number of records.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Return `true` if the collection holds no records.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Find a record by exact id match.
    ///
    /// Returns `None` when no record matches; dangling references are the
    /// caller's concern, not an error here.
    pub async fn find(&self, id: T::Id) -> Option<T> {
        self.items
            .read()
            .await
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Return all records matching `predicate`, in insertion order.
    pub async fn find_matching<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.items
            .read()
            .await
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    /// Append a record and return it.
    ///
    /// The caller is responsible for supplying a freshly generated id;
    /// uniqueness is not re-checked here.
    pub async fn insert(&self, record: T) -> T {
        self.items.write().await.push(record.clone());
        record
    }

    /// Replace the record with the given id and return the stored value.
    ///
    /// Existence is re-checked under the write lock, so a delete racing
    /// between a caller's `find` and this call surfaces as `NotFound`
    /// instead of resurrecting the record. The supplied record must carry
    /// the same id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record with `id` exists.
    pub async fn replace(&self, id: T::Id, record: T) -> Result<T, StoreError> {
        let mut items = self.items.write().await;
        let Some(slot) = items.iter_mut().find(|existing| existing.id() == id) else {
            return Err(StoreError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            });
        };
        *slot = record;
        Ok(slot.clone())
    }

    /// Remove the record with the given id and return the pre-removal
    /// snapshot. There is no soft-delete and no cascade.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record with `id` exists.
    pub async fn remove(&self, id: T::Id) -> Result<T, StoreError> {
        let mut items = self.items.write().await;
        let position = items.iter().position(|record| record.id() == id);
        match position {
            Some(index) => Ok(items.remove(index)),
            None => Err(StoreError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            }),
        }
    }

    /// Remove every record and return the count removed. Never fails.
    pub async fn clear(&self) -> usize {
        let mut items = self.items.write().await;
        let removed = items.len();
        items.clear();
        removed
    }
}
