use std::str::FromStr;
use std::sync::Arc;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::{DateTime, Local, NaiveDate};
use derive_more::Display;
use serde_json::json;

use crate::model::leave_request::{
    LeaveRequest, LeaveStatus, LeaveSubmission, LeaveType, NewLeaveRequest, StatusUpdate,
};
use crate::store::{LeaveStore, SortOrder, StoreError};
use crate::validation::{self, ValidationError};

/// Source of "today" for the leave rules.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Calendar date in the server's local time zone.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Display)]
pub enum ServiceError {
    #[display(fmt = "{} is required", _0)]
    MissingField(&'static str),
    #[display(fmt = "Invalid {}: '{}'", field, value)]
    InvalidField { field: &'static str, value: String },
    #[display(fmt = "{}", _0)]
    Rejected(ValidationError),
    #[display(fmt = "Cannot change status from {} to {}", from, to)]
    InvalidTransition { from: LeaveStatus, to: LeaveStatus },
    #[display(fmt = "Leave request {} not found", _0)]
    NotFound(u64),
    /// Backend failure. The detail is logged where it happens and never
    /// sent to the caller.
    #[display(fmt = "Internal Server Error")]
    Persistence,
}

impl std::error::Error for ServiceError {}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            StoreError::Persistence(_) => ServiceError::Persistence,
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MissingField(_) | ServiceError::InvalidField { .. } => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// Orchestrates submissions and decisions over a [`LeaveStore`].
#[derive(Clone)]
pub struct RequestService {
    store: Arc<dyn LeaveStore>,
    clock: Arc<dyn Clock>,
    validate_on_submit: bool,
}

impl RequestService {
    pub fn new(store: Arc<dyn LeaveStore>, clock: Arc<dyn Clock>, validate_on_submit: bool) -> Self {
        Self {
            store,
            clock,
            validate_on_submit,
        }
    }

    pub async fn submit(&self, input: LeaveSubmission) -> Result<LeaveRequest, ServiceError> {
        let fields = Self::required_fields(input)?;

        if self.validate_on_submit {
            validation::validate(&fields, self.clock.today()).map_err(|reason| {
                tracing::info!(
                    %reason,
                    leave_type = %fields.leave_type,
                    start_date = %fields.start_date,
                    end_date = %fields.end_date,
                    "Leave request rejected"
                );
                ServiceError::Rejected(reason)
            })?;
        }

        let created = self.store.create(&fields).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to create leave request");
            ServiceError::from(e)
        })?;

        tracing::info!(leave_id = created.id, leave_type = %created.leave_type, "Leave request submitted");
        Ok(created)
    }

    pub async fn list(&self, order: SortOrder) -> Result<Vec<LeaveRequest>, ServiceError> {
        self.store.list(order).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave list");
            ServiceError::from(e)
        })
    }

    pub async fn get(&self, leave_id: u64) -> Result<LeaveRequest, ServiceError> {
        self.store.get(leave_id).await.map_err(|e| {
            log_store_error(&e, leave_id, "Failed to fetch leave request");
            ServiceError::from(e)
        })
    }

    pub async fn update_status(
        &self,
        leave_id: u64,
        input: StatusUpdate,
    ) -> Result<LeaveRequest, ServiceError> {
        let raw = present(input.status).ok_or(ServiceError::MissingField("status"))?;
        let next = LeaveStatus::from_str(&raw).map_err(|_| ServiceError::InvalidField {
            field: "status",
            value: raw.clone(),
        })?;

        let current = self.get(leave_id).await?;
        if !current.status.can_transition_to(next) {
            return Err(ServiceError::InvalidTransition {
                from: current.status,
                to: next,
            });
        }

        let updated = self
            .store
            .update_status(leave_id, next)
            .await
            .map_err(|e| {
                log_store_error(&e, leave_id, "Update leave status failed");
                ServiceError::from(e)
            })?;

        tracing::info!(leave_id, status = %updated.status, "Leave status updated");
        Ok(updated)
    }

    pub async fn delete(&self, leave_id: u64) -> Result<(), ServiceError> {
        self.store.delete(leave_id).await.map_err(|e| {
            log_store_error(&e, leave_id, "Delete leave failed");
            ServiceError::from(e)
        })?;

        tracing::info!(leave_id, "Leave request deleted");
        Ok(())
    }

    /// Required fields are checked in form order; blank text counts as absent.
    /// A reversed date range is refused here whether or not the leave rules
    /// run, since no stored request may end before it starts.
    fn required_fields(input: LeaveSubmission) -> Result<NewLeaveRequest, ServiceError> {
        let full_name = present(input.full_name).ok_or(ServiceError::MissingField("fullName"))?;
        let phone = present(input.phone).ok_or(ServiceError::MissingField("phone"))?;
        let leave_type = present(input.leave_type).ok_or(ServiceError::MissingField("leaveType"))?;
        let reason = present(input.reason).ok_or(ServiceError::MissingField("reason"))?;
        let start_date = present(input.start_date).ok_or(ServiceError::MissingField("startDate"))?;
        let end_date = present(input.end_date).ok_or(ServiceError::MissingField("endDate"))?;

        let leave_type = LeaveType::from_str(&leave_type).map_err(|_| ServiceError::InvalidField {
            field: "leaveType",
            value: leave_type.clone(),
        })?;

        let start_date = parse_date("startDate", start_date)?;
        let end_date = parse_date("endDate", end_date)?;
        if end_date < start_date {
            return Err(ServiceError::Rejected(ValidationError::EndBeforeStart));
        }

        Ok(NewLeaveRequest {
            full_name,
            department_position: input.department_position.unwrap_or_default(),
            email: input.email.unwrap_or_default(),
            phone,
            leave_type,
            reason,
            start_date,
            end_date,
        })
    }
}

/// Trimmed value, or `None` when absent or blank.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp and keeps only the date.
fn parse_date(field: &'static str, value: String) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(&value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .ok_or(ServiceError::InvalidField { field, value })
}

fn log_store_error(error: &StoreError, leave_id: u64, message: &str) {
    match error {
        StoreError::NotFound(_) => tracing::debug!(leave_id, "{message}: not found"),
        StoreError::Persistence(_) => tracing::error!(error = %error, leave_id, "{message}"),
    }
}
