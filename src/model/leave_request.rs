use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Sick,
    Personal,
    Vacation,
    Other,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    /// Only a pending request can be decided, and only once.
    pub fn can_transition_to(self, next: LeaveStatus) -> bool {
        matches!(
            (self, next),
            (LeaveStatus::Pending, LeaveStatus::Approved)
                | (LeaveStatus::Pending, LeaveStatus::Rejected)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
        "fullName": "Somchai Jaidee",
        "departmentPosition": "Finance / Accountant",
        "email": "somchai@company.com",
        "phone": "0812345678",
        "leaveType": "vacation",
        "reason": "Family trip",
        "startDate": "2026-01-05",
        "endDate": "2026-01-06",
        "status": "pending",
        "createdAt": "2026-01-01T08:30:00Z"
    })
)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Somchai Jaidee")]
    pub full_name: String,
    #[schema(example = "Finance / Accountant")]
    pub department_position: String,
    #[schema(example = "somchai@company.com")]
    pub email: String,
    #[schema(example = "0812345678")]
    pub phone: String,
    pub leave_type: LeaveType,
    #[schema(example = "Family trip")]
    pub reason: String,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-06", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
    #[schema(example = "2026-01-01T08:30:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

/// Fields of a request that passed the required-field check, ready to persist.
/// The store assigns id, status and creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLeaveRequest {
    pub full_name: String,
    pub department_position: String,
    pub email: String,
    pub phone: String,
    pub leave_type: LeaveType,
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Raw create payload. Every field is optional so that an absent field is
/// reported by name instead of as a body decoding failure. Any `status`
/// sent by the client is dropped.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveSubmission {
    #[schema(example = "Somchai Jaidee")]
    pub full_name: Option<String>,
    #[schema(example = "Finance / Accountant")]
    pub department_position: Option<String>,
    #[schema(example = "somchai@company.com")]
    pub email: Option<String>,
    #[schema(example = "0812345678")]
    pub phone: Option<String>,
    #[schema(example = "vacation")]
    pub leave_type: Option<String>,
    #[schema(example = "Family trip")]
    pub reason: Option<String>,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp
    #[schema(example = "2026-01-05")]
    pub start_date: Option<String>,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp
    #[schema(example = "2026-01-06")]
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StatusUpdate {
    #[schema(example = "approved")]
    pub status: Option<String>,
}
