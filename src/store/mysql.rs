use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::BoxFuture;
use sqlx::{FromRow, MySqlPool};

use super::{LeaveStore, SortOrder, StoreError};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest};

const SELECT_COLUMNS: &str = r#"
    SELECT id, full_name, department_position, email, phone,
           leave_type, reason, start_date, end_date, status, created_at
    FROM leave_requests
"#;

/// Row as MySQL returns it; enum columns are plain VARCHARs.
#[derive(Debug, FromRow)]
struct LeaveRequestRow {
    id: u64,
    full_name: String,
    department_position: String,
    email: String,
    phone: String,
    leave_type: String,
    reason: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<LeaveRequestRow> for LeaveRequest {
    type Error = StoreError;

    fn try_from(row: LeaveRequestRow) -> Result<Self, Self::Error> {
        let leave_type = LeaveType::from_str(&row.leave_type).map_err(|_| {
            StoreError::Persistence(format!(
                "row {} has unknown leave_type '{}'",
                row.id, row.leave_type
            ))
        })?;
        let status = LeaveStatus::from_str(&row.status).map_err(|_| {
            StoreError::Persistence(format!("row {} has unknown status '{}'", row.id, row.status))
        })?;

        Ok(LeaveRequest {
            id: row.id,
            full_name: row.full_name,
            department_position: row.department_position,
            email: row.email,
            phone: row.phone,
            leave_type,
            reason: row.reason,
            start_date: row.start_date,
            end_date: row.end_date,
            status,
            created_at: row.created_at,
        })
    }
}

pub struct MySqlLeaveStore {
    pool: MySqlPool,
}

impl MySqlLeaveStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: u64) -> Result<LeaveRequest, StoreError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
        let row = sqlx::query_as::<_, LeaveRequestRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn insert(&self, fields: &NewLeaveRequest) -> Result<LeaveRequest, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (full_name, department_position, email, phone,
                 leave_type, reason, start_date, end_date, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.full_name)
        .bind(&fields.department_position)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(fields.leave_type.to_string())
        .bind(&fields.reason)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(LeaveStatus::Pending.to_string())
        .execute(&self.pool)
        .await?;

        self.fetch(result.last_insert_id()).await
    }

    async fn select_all(&self, order: SortOrder) -> Result<Vec<LeaveRequest>, StoreError> {
        let direction = match order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        let sql = format!("{SELECT_COLUMNS} ORDER BY created_at {direction}, id {direction}");

        sqlx::query_as::<_, LeaveRequestRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(LeaveRequest::try_from)
            .collect()
    }

    async fn write_status(&self, id: u64, status: LeaveStatus) -> Result<LeaveRequest, StoreError> {
        // rows_affected is 0 when the value is unchanged, so existence is
        // decided by reading the row back.
        sqlx::query("UPDATE leave_requests SET status = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.fetch(id).await
    }

    async fn remove(&self, id: u64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM leave_requests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

impl LeaveStore for MySqlLeaveStore {
    fn create<'a>(
        &'a self,
        fields: &'a NewLeaveRequest,
    ) -> BoxFuture<'a, Result<LeaveRequest, StoreError>> {
        Box::pin(self.insert(fields))
    }

    fn list(&self, order: SortOrder) -> BoxFuture<'_, Result<Vec<LeaveRequest>, StoreError>> {
        Box::pin(self.select_all(order))
    }

    fn get(&self, id: u64) -> BoxFuture<'_, Result<LeaveRequest, StoreError>> {
        Box::pin(self.fetch(id))
    }

    fn update_status(
        &self,
        id: u64,
        status: LeaveStatus,
    ) -> BoxFuture<'_, Result<LeaveRequest, StoreError>> {
        Box::pin(self.write_status(id, status))
    }

    fn delete(&self, id: u64) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(self.remove(id))
    }
}
