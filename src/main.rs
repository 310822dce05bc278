use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod config;
mod db;
mod docs;
mod model;
mod routes;
mod service;
mod store;
mod validation;

use config::{Config, StoreBackend};
use db::init_db;
use service::{RequestService, SystemClock};
use store::{LeaveStore, MemoryLeaveStore, MySqlLeaveStore};

use crate::docs::ApiDoc;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(backend = ?config.store_backend, "Server starting...");

    let store: Arc<dyn LeaveStore> = match config.store_backend {
        StoreBackend::MySql => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = init_db(
                database_url,
                config.db_max_connections,
                config.db_acquire_timeout_secs,
            )
            .await
            .context("Failed to connect to database")?;
            Arc::new(MySqlLeaveStore::new(pool))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store; leave requests are lost on restart");
            Arc::new(MemoryLeaveStore::new())
        }
    };

    if !config.server_side_validation {
        warn!("Server-side leave rule validation is disabled");
    }

    let service = RequestService::new(store, Arc::new(SystemClock), config.server_side_validation);
    let limiter = Arc::new(routes::build_limiter(config.rate_api_per_min)?);
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(service.clone()))
            .service(api::health::health)
            .configure(|cfg| routes::configure(cfg, &config, limiter.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
