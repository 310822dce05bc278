use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::model::leave_request::{LeaveRequest, LeaveSubmission, StatusUpdate};
use crate::service::RequestService;
use crate::store::SortOrder;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// `desc` (newest first, default) or `asc`
    #[param(example = "desc", value_type = Option<String>)]
    pub order: Option<SortOrder>,
}

/* =========================
Submit leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leave-requests",
    request_body(
        content = LeaveSubmission,
        description = "Leave request payload; any status sent is ignored",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request created as pending", body = LeaveRequest),
        (status = 400, description = "Required field missing or malformed", body = Object, example = json!({
            "error": "phone is required"
        })),
        (status = 422, description = "Request breaks a leave rule", body = Object, example = json!({
            "error": "Vacation leave must be requested at least 3 days in advance (requested 1 days ahead)"
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "error": "Internal Server Error"
        }))
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    service: web::Data<RequestService>,
    payload: web::Json<LeaveSubmission>,
) -> actix_web::Result<impl Responder> {
    let created = service.submit(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/* =========================
List leave requests
========================= */
#[utoipa::path(
    get,
    path = "/api/leave-requests",
    params(ListQuery),
    responses(
        (status = 200, description = "All leave requests ordered by creation time", body = [LeaveRequest]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    service: web::Data<RequestService>,
    query: web::Query<ListQuery>,
) -> actix_web::Result<impl Responder> {
    let order = query.order.unwrap_or_default();
    let leaves = service.list(order).await?;
    Ok(HttpResponse::Ok().json(leaves))
}

#[utoipa::path(
    get,
    path = "/api/leave-requests/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "error": "Leave request 7 not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    service: web::Data<RequestService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave = service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
Approve / reject
========================= */
#[utoipa::path(
    patch,
    path = "/api/leave-requests/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to decide")
    ),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Status updated", body = LeaveRequest),
        (status = 400, description = "Status missing or not a known value", body = Object, example = json!({
            "error": "status is required"
        })),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Request was already decided", body = Object, example = json!({
            "error": "Cannot change status from approved to rejected"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn update_leave_status(
    service: web::Data<RequestService>,
    path: web::Path<u64>,
    payload: web::Json<StatusUpdate>,
) -> actix_web::Result<impl Responder> {
    let updated = service
        .update_status(path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/leave-requests/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to delete")
    ),
    responses(
        (status = 200, description = "Leave request deleted", body = Object, example = json!({
            "message": "Deleted successfully"
        })),
        (status = 404, description = "Leave request not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn delete_leave(
    service: web::Data<RequestService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    service.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web, web::Data};
    use chrono::NaiveDate;
    use serde_json::{Value, json};

    use crate::routes;
    use crate::service::{Clock, RequestService};
    use crate::store::MemoryLeaveStore;

    struct FixedClock;

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
        }
    }

    fn service() -> Data<RequestService> {
        Data::new(RequestService::new(
            Arc::new(MemoryLeaveStore::new()),
            Arc::new(FixedClock),
            true,
        ))
    }

    fn body(name: &str) -> Value {
        json!({
            "fullName": name,
            "phone": "0812345678",
            "leaveType": "sick",
            "reason": "flu",
            "startDate": "2025-06-10",
            "endDate": "2025-06-11",
            "status": "approved"
        })
    }

    macro_rules! app {
        ($service:expr) => {
            test::init_service(
                App::new()
                    .app_data($service.clone())
                    .service(web::scope("/api").configure(routes::leave_resources)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn create_returns_201_with_pending_record() {
        let service = service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/api/leave-requests")
            .set_json(body("Somchai"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["status"], "pending");
        assert_eq!(created["fullName"], "Somchai");
        assert_eq!(created["departmentPosition"], "");
        assert!(created["id"].as_u64().is_some());
        assert!(created["createdAt"].is_string());
    }

    #[actix_web::test]
    async fn create_with_missing_field_is_400() {
        let service = service();
        let app = app!(service);

        let mut payload = body("Somchai");
        payload.as_object_mut().unwrap().remove("reason");
        let req = test::TestRequest::post()
            .uri("/api/leave-requests")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let error: Value = test::read_body_json(resp).await;
        assert_eq!(error["error"], "reason is required");
    }

    #[actix_web::test]
    async fn create_breaking_leave_rule_is_422() {
        let service = service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/api/leave-requests")
            .set_json(json!({
                "fullName": "Somchai",
                "phone": "0812345678",
                "leaveType": "vacation",
                "reason": "trip",
                "startDate": "2025-06-15",
                "endDate": "2025-06-18"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn list_honours_order_parameter() {
        let service = service();
        let app = app!(service);

        for name in ["first", "second"] {
            let req = test::TestRequest::post()
                .uri("/api/leave-requests")
                .set_json(body(name))
                .to_request();
            assert!(test::call_service(&app, req).await.status().is_success());
        }

        let req = test::TestRequest::get().uri("/api/leave-requests").to_request();
        let desc: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(desc[0]["fullName"], "second");

        let req = test::TestRequest::get()
            .uri("/api/leave-requests?order=asc")
            .to_request();
        let asc: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(asc[0]["fullName"], "first");
        assert_eq!(asc.len(), 2);
    }

    #[actix_web::test]
    async fn patch_without_status_is_400_and_with_status_is_200() {
        let service = service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/api/leave-requests")
            .set_json(body("Somchai"))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let uri = format!("/api/leave-requests/{}", created["id"]);

        let req = test::TestRequest::patch()
            .uri(&uri)
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::patch()
            .uri(&uri)
            .set_json(json!({ "status": "approved" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let updated: Value = test::read_body_json(resp).await;
        assert_eq!(updated["status"], "approved");

        let req = test::TestRequest::patch()
            .uri(&uri)
            .set_json(json!({ "status": "rejected" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn delete_then_delete_again_is_404() {
        let service = service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/api/leave-requests")
            .set_json(body("Somchai"))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let uri = format!("/api/leave-requests/{}", created["id"]);

        let req = test::TestRequest::delete().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let message: Value = test::read_body_json(resp).await;
        assert_eq!(message["message"], "Deleted successfully");

        let req = test::TestRequest::delete().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    async fn assert_json_bad_request(resp: actix_web::dev::ServiceResponse) {
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let content_type = resp
            .headers()
            .get(actix_web::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("application/json"), "got {content_type}");
        let error: Value = test::read_body_json(resp).await;
        assert!(error["error"].is_string());
    }

    #[actix_web::test]
    async fn malformed_body_is_json_400() {
        let service = service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/api/leave-requests")
            .set_json(json!({ "fullName": 5 }))
            .to_request();
        assert_json_bad_request(test::call_service(&app, req).await).await;

        let req = test::TestRequest::patch()
            .uri("/api/leave-requests/1")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        assert_json_bad_request(test::call_service(&app, req).await).await;
    }

    #[actix_web::test]
    async fn unknown_order_is_json_400() {
        let service = service();
        let app = app!(service);

        let req = test::TestRequest::get()
            .uri("/api/leave-requests?order=sideways")
            .to_request();
        assert_json_bad_request(test::call_service(&app, req).await).await;
    }

    #[actix_web::test]
    async fn non_numeric_id_is_json_400() {
        let service = service();
        let app = app!(service);

        let req = test::TestRequest::delete()
            .uri("/api/leave-requests/abc")
            .to_request();
        assert_json_bad_request(test::call_service(&app, req).await).await;
    }
}
