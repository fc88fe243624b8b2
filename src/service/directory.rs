//! Client directory facade
//!
//! Remote operations over the shared client index, each one a monitored
//! invocation. Mutations here are best-effort and in-memory only; the next
//! applied snapshot discards them.

use std::sync::Arc;

use crate::client::{ClientId, ClientRecord};
use crate::index::ClientIndex;
use crate::monitor::InvocationMonitor;

use super::errors::{ServiceError, ServiceResult};
use super::ids::IdGenerator;

/// Operation names used as metric tags
pub mod operation {
    pub const GET_ALL: &str = "getAllClients";
    pub const GET_BY_ID: &str = "getClientById";
    pub const GET_BY_EMAIL: &str = "getClientByEmail";
    pub const SEARCH: &str = "searchClients";
    pub const CREATE: &str = "createClient";
    pub const UPDATE: &str = "updateClient";
    pub const DELETE: &str = "deleteClient";
}

/// The request facade
#[derive(Debug)]
pub struct ClientDirectory {
    index: Arc<ClientIndex>,
    monitor: InvocationMonitor,
    ids: IdGenerator,
}

impl ClientDirectory {
    pub fn new(index: Arc<ClientIndex>, monitor: InvocationMonitor) -> Self {
        Self {
            index,
            monitor,
            ids: IdGenerator::new(),
        }
    }

    /// Shared index handle
    pub fn index(&self) -> &Arc<ClientIndex> {
        &self.index
    }

    /// Every cached record, ordered by id
    pub fn list_all(&self) -> ServiceResult<Vec<Arc<ClientRecord>>> {
        self.monitor
            .observe(operation::GET_ALL, || self.index.all().map_err(ServiceError::from))
    }

    pub fn get_by_id(&self, id: ClientId) -> ServiceResult<Option<Arc<ClientRecord>>> {
        self.monitor.observe(operation::GET_BY_ID, || {
            self.index.get_by_id(id).map_err(ServiceError::from)
        })
    }

    /// Case-insensitive; an absent email is not found
    pub fn get_by_email(&self, email: Option<&str>) -> ServiceResult<Option<Arc<ClientRecord>>> {
        self.monitor.observe(operation::GET_BY_EMAIL, || {
            self.index.get_by_email(email).map_err(ServiceError::from)
        })
    }

    pub fn search(
        &self,
        city: Option<&str>,
        name: Option<&str>,
    ) -> ServiceResult<Vec<Arc<ClientRecord>>> {
        self.monitor.observe(operation::SEARCH, || {
            self.index.search(city, name).map_err(ServiceError::from)
        })
    }

    /// Add a record to the cache, assigning an id when it has none.
    ///
    /// A caller-supplied id is kept as is and overwrites any record
    /// already stored under it.
    pub fn create(&self, mut record: ClientRecord) -> ServiceResult<Arc<ClientRecord>> {
        self.monitor.observe(operation::CREATE, || -> ServiceResult<_> {
            if record.id.is_none() {
                record.id = Some(self.fresh_id()?);
            }
            let record = Arc::new(record);
            self.index.upsert(ClientRecord::clone(&record))?;
            Ok(record)
        })
    }

    /// Overwrite the mutable fields of an existing record.
    ///
    /// Returns `None` without creating anything when `id` is unknown. The
    /// id in `changes`, if any, is ignored.
    pub fn update(
        &self,
        id: ClientId,
        changes: ClientRecord,
    ) -> ServiceResult<Option<Arc<ClientRecord>>> {
        self.monitor.observe(operation::UPDATE, || {
            self.index
                .update(id, |record| record.apply_update(&changes))
                .map_err(ServiceError::from)
        })
    }

    /// Returns whether a record was removed
    pub fn delete(&self, id: ClientId) -> ServiceResult<bool> {
        self.monitor
            .observe(operation::DELETE, || self.index.delete(id).map_err(ServiceError::from))
    }

    /// A generated id not currently used by a snapshot record
    fn fresh_id(&self) -> ServiceResult<ClientId> {
        loop {
            let id = self.ids.next_id();
            if self.index.get_by_id(id)?.is_none() {
                return Ok(id);
            }
        }
    }
}
