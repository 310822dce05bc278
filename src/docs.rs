use crate::model::leave_request::{
    LeaveRequest, LeaveStatus, LeaveSubmission, LeaveType, StatusUpdate,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Tracker API",
        version = "0.1.0",
        description = r#"
## Leave Request Tracker

Staff submit leave applications; reviewers list, approve, reject or delete them.

### Rules enforced on submit
- The end date cannot be earlier than the start date
- Leave cannot start in the past
- Vacation leave needs at least 3 days notice and lasts at most 2 days

### Lifecycle
Requests are created as `pending` and can be decided once, to `approved` or `rejected`.

### Errors
Failures return `{"error": "<message>"}`.
"#,
    ),
    paths(
        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::update_leave_status,
        crate::api::leave_request::delete_leave,

        crate::api::health::health
    ),
    components(
        schemas(
            LeaveRequest,
            LeaveSubmission,
            StatusUpdate,
            LeaveType,
            LeaveStatus
        )
    ),
    tags(
        (name = "Leave", description = "Leave request APIs"),
        (name = "Health", description = "Liveness probe"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_leave_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/leave-requests"));
        assert!(doc.paths.paths.contains_key("/api/leave-requests/{leave_id}"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
