use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use futures::future::BoxFuture;

use super::{LeaveStore, SortOrder, StoreError};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, NewLeaveRequest};

#[derive(Default)]
struct State {
    last_id: u64,
    records: BTreeMap<u64, LeaveRequest>,
}

/// Process-local store. Ids keep increasing across deletes.
#[derive(Default)]
pub struct MemoryLeaveStore {
    state: Mutex<State>,
}

impl MemoryLeaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Persistence("memory store lock poisoned".to_string()))
    }

    fn insert(&self, fields: &NewLeaveRequest) -> Result<LeaveRequest, StoreError> {
        let mut state = self.lock()?;
        state.last_id += 1;
        let record = LeaveRequest {
            id: state.last_id,
            full_name: fields.full_name.clone(),
            department_position: fields.department_position.clone(),
            email: fields.email.clone(),
            phone: fields.phone.clone(),
            leave_type: fields.leave_type,
            reason: fields.reason.clone(),
            start_date: fields.start_date,
            end_date: fields.end_date,
            status: LeaveStatus::Pending,
            created_at: Utc::now(),
        };
        state.records.insert(record.id, record.clone());
        Ok(record)
    }

    fn sorted(&self, order: SortOrder) -> Result<Vec<LeaveRequest>, StoreError> {
        let state = self.lock()?;
        let mut records: Vec<LeaveRequest> = state.records.values().cloned().collect();
        records.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        if order == SortOrder::Desc {
            records.reverse();
        }
        Ok(records)
    }

    fn find(&self, id: u64) -> Result<LeaveRequest, StoreError> {
        let state = self.lock()?;
        state
            .records
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn set_status(&self, id: u64, status: LeaveStatus) -> Result<LeaveRequest, StoreError> {
        let mut state = self.lock()?;
        let record = state.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.status = status;
        Ok(record.clone())
    }

    fn remove(&self, id: u64) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}

impl LeaveStore for MemoryLeaveStore {
    fn create<'a>(
        &'a self,
        fields: &'a NewLeaveRequest,
    ) -> BoxFuture<'a, Result<LeaveRequest, StoreError>> {
        Box::pin(async move { self.insert(fields) })
    }

    fn list(&self, order: SortOrder) -> BoxFuture<'_, Result<Vec<LeaveRequest>, StoreError>> {
        Box::pin(async move { self.sorted(order) })
    }

    fn get(&self, id: u64) -> BoxFuture<'_, Result<LeaveRequest, StoreError>> {
        Box::pin(async move { self.find(id) })
    }

    fn update_status(
        &self,
        id: u64,
        status: LeaveStatus,
    ) -> BoxFuture<'_, Result<LeaveRequest, StoreError>> {
        Box::pin(async move { self.set_status(id, status) })
    }

    fn delete(&self, id: u64) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move { self.remove(id) })
    }
}
