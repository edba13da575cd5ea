// QueryPad Server entrypoint
//!
//! Initialization and HTTP wiring live in `lifecycle` so this file remains a
//! thin orchestrator.

use anyhow::Result;
use log::info;
use querypad_configs::ServerConfig;
use querypad_server::lifecycle::{bootstrap, run};
use querypad_server::logging;
use std::path::Path;

const CONFIG_PATH: &str = "config.toml";

#[actix_web::main]
async fn main() -> Result<()> {
    // Optional path override: `querypad-server path/to/config.toml`
    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_PATH.to_string());

    // Load configuration (fallback to defaults when config file missing)
    if Path::new(&config_path).exists() {
        eprintln!("Loading config from: {}", config_path);
    } else {
        eprintln!("Config file {} not found, using defaults", config_path);
    }
    let mut config = match ServerConfig::load_or_default(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("FATAL: {}", e);
            std::process::exit(1);
        },
    };
    if let Err(e) = config.apply_env_overrides() {
        eprintln!("FATAL: {}", e);
        std::process::exit(1);
    }

    // Logging before any other side effects
    logging::init_logging(&config.logging)?;

    info!("QueryPad Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Commit: {}  Branch: {}", env!("GIT_COMMIT_HASH"), env!("GIT_BRANCH"));
    info!("Host: {}  Port: {}", config.server.host, config.server.port);

    let app_context = bootstrap(&config)?;

    // Run HTTP server until termination signal is received
    run(&config, app_context).await
}
