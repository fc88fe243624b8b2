//! Client Index
//!
//! # API
//!
//! - `bulk_replace(records)` - Discard everything and repopulate atomically
//! - `upsert(record)` - Insert or overwrite one record
//! - `update(id, f)` - Modify an existing record in place
//! - `get_by_id(id)` / `get_by_email(email)` - Point lookups
//! - `search(city, name)` - Case-insensitive substring filter
//! - `delete(id)` - Remove one record from both mappings
//!
//! The secondary mapping stores ids, and email lookups resolve through the
//! primary mapping. An email lookup therefore always yields the same `Arc`
//! as the corresponding id lookup.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::client::{ClientId, ClientRecord};

use super::errors::{IndexError, IndexResult};

/// Outcome of a bulk replace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReloadSummary {
    /// Records now retrievable by id
    pub loaded: usize,
    /// Input entries dropped for lack of an id
    pub skipped_without_id: usize,
    /// Loaded records reachable by id only
    pub without_email: usize,
}

#[derive(Debug, Default)]
struct IndexState {
    /// Primary mapping
    by_id: HashMap<ClientId, Arc<ClientRecord>>,
    /// Secondary mapping, lowercased email -> id
    by_email: HashMap<String, ClientId>,
}

impl IndexState {
    /// A replaced email keeps its entry until the next bulk replace.
    fn insert(&mut self, id: ClientId, record: Arc<ClientRecord>) {
        if let Some(email) = record.normalized_email() {
            self.by_email.insert(email, id);
        }
        self.by_id.insert(id, record);
    }

    fn resolve_email(&self, email: &str) -> Option<&Arc<ClientRecord>> {
        self.by_email
            .get(email)
            .and_then(|id| self.by_id.get(id))
    }
}

/// Concurrent in-memory client store
#[derive(Debug, Default)]
pub struct ClientIndex {
    state: RwLock<IndexState>,
}

impl ClientIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self, op: &'static str) -> IndexResult<RwLockReadGuard<'_, IndexState>> {
        self.state.read().map_err(|_| IndexError::LockPoisoned(op))
    }

    fn write(&self, op: &'static str) -> IndexResult<RwLockWriteGuard<'_, IndexState>> {
        self.state.write().map_err(|_| IndexError::LockPoisoned(op))
    }

    /// Replace the entire contents with `records`.
    ///
    /// The replacement maps are built before the lock is taken; the swap
    /// itself is a single assignment under the write lock. Entries without
    /// an id are skipped. When the input repeats an id, the last entry
    /// wins and the email of the earlier one is unmapped.
    pub fn bulk_replace(&self, records: Vec<ClientRecord>) -> IndexResult<ReloadSummary> {
        let mut next = IndexState {
            by_id: HashMap::with_capacity(records.len()),
            by_email: HashMap::with_capacity(records.len()),
        };
        let mut skipped_without_id = 0;

        for record in records {
            let Some(id) = record.id else {
                skipped_without_id += 1;
                continue;
            };

            if let Some(previous) = next.by_id.get(&id) {
                if let Some(stale) = previous.normalized_email() {
                    if next.by_email.get(&stale) == Some(&id) {
                        next.by_email.remove(&stale);
                    }
                }
            }
            next.insert(id, Arc::new(record));
        }

        let summary = ReloadSummary {
            loaded: next.by_id.len(),
            skipped_without_id,
            without_email: next
                .by_id
                .values()
                .filter(|r| r.normalized_email().is_none())
                .count(),
        };

        let previous = {
            let mut state = self.write("bulk_replace")?;
            std::mem::replace(&mut *state, next)
        };
        // Old contents are released after the lock is gone.
        drop(previous);

        Ok(summary)
    }

    /// Insert or overwrite a record.
    ///
    /// Returns `false` (and stores nothing) when the record has no id.
    ///
    /// If the record previously existed under a different email, the old
    /// email keeps resolving to this id. That leftover mapping is known
    /// and left in place; it disappears on delete or on the next reload.
    pub fn upsert(&self, record: ClientRecord) -> IndexResult<bool> {
        let Some(id) = record.id else {
            return Ok(false);
        };
        let record = Arc::new(record);

        let mut state = self.write("upsert")?;
        state.insert(id, record);
        Ok(true)
    }

    /// Modify an existing record in place.
    ///
    /// `modify` runs under the write lock against a copy of the current
    /// record; the result replaces it and its email is mapped. Unknown ids
    /// are left alone and yield `None`, so an update racing a reload that
    /// dropped the id cannot resurrect it. The id itself is restored after
    /// `modify` returns.
    pub fn update<F>(&self, id: ClientId, modify: F) -> IndexResult<Option<Arc<ClientRecord>>>
    where
        F: FnOnce(&mut ClientRecord),
    {
        let mut state = self.write("update")?;

        let Some(current) = state.by_id.get(&id) else {
            return Ok(None);
        };
        let mut next = ClientRecord::clone(current);
        modify(&mut next);
        next.id = Some(id);

        let next = Arc::new(next);
        state.insert(id, Arc::clone(&next));
        Ok(Some(next))
    }

    /// Look up a record by id
    pub fn get_by_id(&self, id: ClientId) -> IndexResult<Option<Arc<ClientRecord>>> {
        let state = self.read("get_by_id")?;
        Ok(state.by_id.get(&id).cloned())
    }

    /// Look up a record by email, ignoring case.
    ///
    /// An absent or empty email is simply not found.
    pub fn get_by_email(&self, email: Option<&str>) -> IndexResult<Option<Arc<ClientRecord>>> {
        let Some(email) = email.filter(|e| !e.is_empty()) else {
            return Ok(None);
        };
        let key = email.to_lowercase();

        let state = self.read("get_by_email")?;
        Ok(state.resolve_email(&key).cloned())
    }

    /// All records whose city and name contain the respective filters,
    /// ignoring case. Absent or empty filters match everything.
    ///
    /// Results are ordered by id.
    pub fn search(
        &self,
        city: Option<&str>,
        name: Option<&str>,
    ) -> IndexResult<Vec<Arc<ClientRecord>>> {
        let city = city.unwrap_or_default();
        let name = name.unwrap_or_default();

        let mut matches: Vec<_> = {
            let state = self.read("search")?;
            state
                .by_id
                .values()
                .filter(|r| {
                    ClientRecord::field_contains(r.city.as_deref(), city)
                        && ClientRecord::field_contains(r.name.as_deref(), name)
                })
                .cloned()
                .collect()
        };

        matches.sort_by_key(|r| r.id);
        Ok(matches)
    }

    /// Every record, ordered by id
    pub fn all(&self) -> IndexResult<Vec<Arc<ClientRecord>>> {
        self.search(None, None)
    }

    /// Remove a record.
    ///
    /// The email entry is removed only while it still resolves to the
    /// removed id, so an unrelated record that since claimed the same
    /// email stays reachable. Returns whether a record was removed.
    pub fn delete(&self, id: ClientId) -> IndexResult<bool> {
        let mut state = self.write("delete")?;

        let Some(removed) = state.by_id.remove(&id) else {
            return Ok(false);
        };

        if let Some(email) = removed.normalized_email() {
            if state.by_email.get(&email) == Some(&id) {
                state.by_email.remove(&email);
            }
        }

        Ok(true)
    }

    /// Number of records retrievable by id
    pub fn len(&self) -> IndexResult<usize> {
        Ok(self.read("len")?.by_id.len())
    }

    /// Check if empty
    pub fn is_empty(&self) -> IndexResult<bool> {
        Ok(self.len()? == 0)
    }
}
