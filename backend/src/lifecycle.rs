//! Server lifecycle management helpers.
//!
//! Bootstraps the shared dataset and SQL generator, then wires the HTTP
//! server around them.

use crate::middleware;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use anyhow::Result;
use log::{debug, info, warn};
use querypad_api::{configure_routes, json_config};
use querypad_configs::defaults::resolve_workers;
use querypad_configs::ServerConfig;
use querypad_core::{AppContext, GeminiGenerator, SharedDataset};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Build the shared dataset and generator, and wrap them in an [`AppContext`].
pub fn bootstrap(config: &ServerConfig) -> Result<Arc<AppContext>> {
    let phase_start = Instant::now();
    let shared = Arc::new(SharedDataset::from_settings(&config.dataset)?);
    let tables = shared.table_names()?;
    info!(
        "Shared dataset ready: {} table(s) ({:.2}ms)",
        tables.len(),
        phase_start.elapsed().as_secs_f64() * 1000.0
    );
    debug!("Shared tables: {:?}", tables);

    let generator = GeminiGenerator::from_settings(&config.generation)?;
    if generator.is_configured() {
        info!("SQL generation enabled (model: {})", config.generation.model);
    } else {
        warn!("GEMINI_API_KEY is not set; SQL generation endpoints will return errors");
    }

    Ok(Arc::new(AppContext::new(shared, Arc::new(generator))))
}

/// Build the HTTP server on an already-bound listener without starting it.
pub fn build_server(config: &ServerConfig, app_context: Arc<AppContext>, listener: TcpListener) -> Result<Server> {
    let cors_config = config.security.cors.clone();
    let body_limit = config.security.max_request_body_size;
    let perf = config.performance.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::request_logger())
            .wrap(middleware::build_cors_from_config(&cors_config))
            .app_data(web::Data::new(app_context.clone()))
            .app_data(json_config(body_limit))
            .configure(configure_routes)
    })
    // Set backlog BEFORE listen() - this affects the listen queue size
    .backlog(perf.backlog)
    .listen(listener)?
    .workers(resolve_workers(config.server.workers))
    .keep_alive(Duration::from_secs(perf.keepalive_timeout))
    .client_request_timeout(Duration::from_secs(perf.client_request_timeout))
    .client_disconnect_timeout(Duration::from_secs(perf.client_disconnect_timeout))
    .run();

    Ok(server)
}

/// Bind the configured address and serve until a termination signal arrives.
pub async fn run(config: &ServerConfig, app_context: Arc<AppContext>) -> Result<()> {
    let bind_addr = config.server.bind_addr();
    info!("Starting HTTP server on {}", bind_addr);
    info!(
        "Server config: workers={}, backlog={}, body_limit={}KB",
        resolve_workers(config.server.workers),
        config.performance.backlog,
        config.security.max_request_body_size / 1024
    );
    debug!(
        "Endpoints: POST /api/execute-sql, /api/execute-csv-sql, /api/generate-sql, /api/generate-csv-sql, /api/delete-all-tables; GET /health"
    );

    let listener = TcpListener::bind(&bind_addr)
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", bind_addr, e))?;
    let server = build_server(config, app_context, listener)?;

    // Actix installs SIGINT/SIGTERM handlers and stops gracefully on its own.
    server.await?;
    info!("Server stopped");
    Ok(())
}
