use std::fmt;

use actix_web::{HttpResponse, error::InternalError, web};
use serde_json::json;

/// Turns an extractor failure into a 400 with the `{"error": ...}` body the
/// handlers use, keeping the original error as the cause.
fn bad_request<E>(err: E) -> actix_web::Error
where
    E: fmt::Debug + fmt::Display + 'static,
{
    let body = json!({ "error": err.to_string() });
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected request body");
        bad_request(err)
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| bad_request(err))
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| bad_request(err))
}
