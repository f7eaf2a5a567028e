//! HTTP surface for the remote game server.
//!
//! Routes: `GET /health`, `GET /init`, `POST /spin`. Request handling is
//! thin — it extracts `X-Player-Id`, delegates to the orchestrators, and
//! maps `GameError` onto the wire error shape. All game logic lives in
//! `rgs-orchestrator` and below.

pub mod handlers;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;
use rgs_config::Configuration;
use rgs_orchestrator::InitOrchestrator;
use rgs_orchestrator::SpinOrchestrator;
use rgs_state::InMemoryStore;
use rgs_telemetry::TelemetryService;
use std::sync::Arc;
use std::time::Duration;

/// Shared, immutable-after-startup state handed to every handler.
pub struct AppState {
    pub config: Arc<Configuration>,
    pub init_orchestrator: InitOrchestrator,
    pub spin_orchestrator: SpinOrchestrator,
}

#[rustfmt::skip]
pub async fn run() -> Result<(), std::io::Error> {
    let config = Arc::new(Configuration::from_env());
    let store = Arc::new(InMemoryStore::new(
        Duration::from_secs(config.idempotency_ttl_seconds),
        Duration::from_secs(config.lock_ttl_seconds),
    ));
    let telemetry = Arc::new(TelemetryService::default());

    let state = web::Data::new(AppState {
        config: config.clone(),
        init_orchestrator: InitOrchestrator::new(config.clone(), store.clone(), telemetry.clone()),
        spin_orchestrator: SpinOrchestrator::new(config.clone(), store.clone(), telemetry.clone()),
    });

    log::info!("starting rgs server");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(state.clone())
            .route("/health", web::get().to(handlers::health))
            .route("/init", web::get().to(handlers::init))
            .route("/spin", web::post().to(handlers::spin))
    })
    .bind(std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()))?
    .run()
    .await
}
