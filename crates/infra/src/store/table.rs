use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use shelfmate_core::{StoreError, StoreResult};

/// Rows keyed by a serial integer id, assigned on insert.
#[derive(Debug)]
struct Rows<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

/// In-memory table with database-style serial keys.
///
/// A poisoned lock is reported as [`StoreError::Unavailable`] rather than
/// silently treated as empty.
#[derive(Debug)]
pub struct SerialTable<T> {
    inner: RwLock<Rows<T>>,
}

impl<T> Default for SerialTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SerialTable<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Rows {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Rows<T>>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("table lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Rows<T>>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("table lock poisoned".into()))
    }

    /// Insert the row built by `build` under the next id (one past the largest ever used).
    ///
    /// `check` sees the current rows first and may refuse the insert.
    pub fn insert_with<F, C>(&self, check: C, build: F) -> StoreResult<T>
    where
        T: Clone,
        C: FnOnce(&mut dyn Iterator<Item = &T>) -> StoreResult<()>,
        F: FnOnce(i64) -> T,
    {
        let mut guard = self.write()?;
        check(&mut guard.rows.values())?;
        let id = guard.last_id + 1;
        let row = build(id);
        guard.rows.insert(id, row.clone());
        guard.last_id = id;
        Ok(row)
    }

    pub fn get(&self, id: i64) -> StoreResult<Option<T>>
    where
        T: Clone,
    {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    pub fn find<P>(&self, predicate: P) -> StoreResult<Option<T>>
    where
        T: Clone,
        P: Fn(&T) -> bool,
    {
        Ok(self.read()?.rows.values().find(|row| predicate(row)).cloned())
    }

    /// Rows matching `predicate`, in id order.
    pub fn filter<P>(&self, predicate: P) -> StoreResult<Vec<T>>
    where
        T: Clone,
        P: Fn(&T) -> bool,
    {
        Ok(self
            .read()?
            .rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect())
    }

    /// Apply `change` to row `id` if it exists and satisfies `visible`.
    pub fn update<V, F>(&self, id: i64, visible: V, change: F) -> StoreResult<Option<T>>
    where
        T: Clone,
        V: Fn(&T) -> bool,
        F: FnOnce(&mut T),
    {
        let mut guard = self.write()?;
        match guard.rows.get_mut(&id) {
            Some(row) if visible(row) => {
                change(row);
                Ok(Some(row.clone()))
            }
            _ => Ok(None),
        }
    }

    /// Remove row `id` if it exists and satisfies `visible`.
    pub fn remove<V>(&self, id: i64, visible: V) -> StoreResult<bool>
    where
        V: Fn(&T) -> bool,
    {
        let mut guard = self.write()?;
        if guard.rows.get(&id).is_some_and(|row| visible(row)) {
            guard.rows.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
