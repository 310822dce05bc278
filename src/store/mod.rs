use derive_more::Display;
use futures::future::BoxFuture;
use serde::Deserialize;

use crate::model::leave_request::{LeaveRequest, LeaveStatus, NewLeaveRequest};

mod memory;
mod mysql;

pub use memory::MemoryLeaveStore;
pub use mysql::MySqlLeaveStore;

/// Direction of the `created_at` ordering used by [`LeaveStore::list`].
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "leave request {} not found", _0)]
    NotFound(u64),
    #[display(fmt = "persistence failure: {}", _0)]
    Persistence(String),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        StoreError::Persistence(value.to_string())
    }
}

/// Durable CRUD over leave requests.
///
/// `create` always stores the request as pending. `update_status` writes
/// whatever status it is given; lifecycle rules belong to the caller.
pub trait LeaveStore: Send + Sync {
    fn create<'a>(
        &'a self,
        fields: &'a NewLeaveRequest,
    ) -> BoxFuture<'a, Result<LeaveRequest, StoreError>>;

    fn list(&self, order: SortOrder) -> BoxFuture<'_, Result<Vec<LeaveRequest>, StoreError>>;

    fn get(&self, id: u64) -> BoxFuture<'_, Result<LeaveRequest, StoreError>>;

    fn update_status(
        &self,
        id: u64,
        status: LeaveStatus,
    ) -> BoxFuture<'_, Result<LeaveRequest, StoreError>>;

    /// Hard delete.
    fn delete(&self, id: u64) -> BoxFuture<'_, Result<(), StoreError>>;
}
