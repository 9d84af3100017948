use anyhow::Result;
use harness_control::{Dispatcher, IdleWatchdog};
use harness_functions::BuiltinRegistry;
use harness_metrics::{MetricsService, TracingService};
use harness_models::Config;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

fn load_config() -> Result<Config> {
    let config_paths = ["configs/default.toml", "config/harness.toml"];

    for path in &config_paths {
        if Path::new(path).exists() {
            let config = Config::load(Path::new(path))?;
            info!("Loaded configuration from {}", path);
            return Ok(config);
        }
    }

    anyhow::bail!("no config file found")
}

#[tokio::main]
async fn main() -> Result<()> {
    TracingService::init();

    info!("Starting harness execution server");

    let config = load_config().unwrap_or_else(|e| {
        warn!("Failed to load config file: {}, using defaults", e);
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    });

    // Preloaded functions need their assets on disk before the first request.
    let functions_dir = Path::new(&config.functions.dir);
    if !functions_dir.exists() {
        warn!(
            "Functions directory {} does not exist; handlers reading assets will fail",
            functions_dir.display()
        );
    }

    let registry = Arc::new(BuiltinRegistry::with_defaults());
    info!("Built-in handlers: {:?}", registry.keys());

    let metrics = Arc::new(MetricsService::new()?);
    let dispatcher = Arc::new(Dispatcher::new(config.clone(), registry));

    let preloaded = dispatcher.preload()?;
    info!("Preloaded {} function(s) from configuration", preloaded);

    // Idle watchdog keeps cold-start measurements honest over long runs.
    let watchdog_handle = {
        let watchdog = IdleWatchdog::new(config.clone(), dispatcher.pool());
        tokio::spawn(async move {
            watchdog.start().await;
        })
    };

    let bind = config.server.bind.clone();
    let port = config.server.port;
    let server_handle = {
        let dispatcher = dispatcher.clone();
        let metrics = metrics.clone();
        let config = config.clone();
        tokio::spawn(async move {
            if let Err(e) = harness_api::start_server(bind, port, dispatcher, metrics, config).await
            {
                warn!("Execution server error: {}", e);
            }
        })
    };

    info!(
        "Harness server started. API: {}:{}",
        config.server.bind, config.server.port
    );

    match signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(err) => warn!("Unable to listen for shutdown signal: {}", err),
    }

    info!("Shutting down harness server...");
    server_handle.abort();
    watchdog_handle.abort();

    info!("Harness server shutdown complete");
    Ok(())
}
