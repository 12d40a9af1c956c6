//! Per-type cache of discovered injectable fields.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{Injectable, InjectableField};
use crate::registry::RandomState;

/// The marked fields of one concrete type, in declaration order.
pub(crate) type FieldTable<T> = Vec<InjectableField<T>>;

/// Cache of field tables keyed by the target's `TypeId`.
///
/// Type shapes never change at runtime, so entries are never invalidated.
/// Two threads discovering the same type at once may both compute a table;
/// the first one stored is kept and returned to both.
#[derive(Default)]
pub(crate) struct FieldCache {
    tables: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>, RandomState>>,
}

impl FieldCache {
    /// Returns the cached table for `T`, discovering it on first use.
    pub(crate) fn fields_of<T: Injectable>(&self) -> Arc<FieldTable<T>> {
        let id = TypeId::of::<T>();

        if let Some(table) = self.tables.read().get(&id) {
            if let Ok(table) = table.clone().downcast::<FieldTable<T>>() {
                return table;
            }
        }

        // Discovery runs user code; do it outside the lock.
        let discovered: Arc<FieldTable<T>> = Arc::new(T::injectable_fields());
        tracing::trace!(
            target_type = std::any::type_name::<T>(),
            fields = discovered.len(),
            "discovered injectable fields"
        );

        let stored = self
            .tables
            .write()
            .entry(id)
            .or_insert_with(|| discovered.clone() as Arc<dyn Any + Send + Sync>)
            .clone();

        stored.downcast::<FieldTable<T>>().unwrap_or(discovered)
    }

    /// Number of types discovered so far.
    pub(crate) fn len(&self) -> usize {
        self.tables.read().len()
    }
}
