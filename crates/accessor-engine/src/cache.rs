//! Per-class accessor cache
//!
//! Append-only map from class ID to an immutable accessor table. Tables are a
//! pure function of the (immutable) class registry, so two threads racing on
//! the same class compute identical tables; whichever publishes first wins and
//! the other result is dropped.

use std::sync::Arc;

use accessor_types::{ClassAccessors, ClassId};
use dashmap::DashMap;

/// Cache of resolved accessor tables, keyed by class
#[derive(Debug, Default)]
pub struct TypeAccessorCache {
    /// Map of class ID to its accessor table
    entries: DashMap<ClassId, Arc<ClassAccessors>>,
}

impl TypeAccessorCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Get a cached table
    pub fn get(&self, class_id: ClassId) -> Option<Arc<ClassAccessors>> {
        self.entries.get(&class_id).map(|entry| entry.clone())
    }

    /// Get a cached table, computing and publishing it on a miss
    ///
    /// `compute` runs without any shard lock held. A failed computation
    /// publishes nothing.
    pub fn get_or_try_insert_with<E, F>(
        &self,
        class_id: ClassId,
        compute: F,
    ) -> Result<Arc<ClassAccessors>, E>
    where
        F: FnOnce() -> Result<ClassAccessors, E>,
    {
        if let Some(table) = self.get(class_id) {
            return Ok(table);
        }
        let table = Arc::new(compute()?);
        Ok(self.entries.entry(class_id).or_insert(table).clone())
    }

    /// Check if a class has a cached table
    pub fn contains(&self, class_id: ClassId) -> bool {
        self.entries.contains_key(&class_id)
    }

    /// Number of cached classes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
