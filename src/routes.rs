use crate::{
    api::{extract, leave_request},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::{Result, anyhow};
use std::sync::Arc;

pub type ApiLimiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per peer IP limiter allowing `requests_per_min` with an equal burst.
pub fn build_limiter(requests_per_min: u32) -> Result<ApiLimiter> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min} requests per minute"))?;
    Ok(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiter: Arc<ApiLimiter>) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(limiter) // rate limiting
            .configure(leave_resources),
    );
}

pub fn leave_resources(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leave-requests")
            .app_data(extract::json_config())
            .app_data(extract::query_config())
            .app_data(extract::path_config())
            // /leave-requests
            .service(
                web::resource("")
                    .route(web::get().to(leave_request::leave_list))
                    .route(web::post().to(leave_request::create_leave)),
            )
            // /leave-requests/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(leave_request::get_leave))
                    .route(web::patch().to(leave_request::update_leave_status))
                    .route(web::delete().to(leave_request::delete_leave)),
            ),
    );
}
