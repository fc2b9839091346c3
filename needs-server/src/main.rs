use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs;

use needs_server::{router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();

    fs::create_dir_all(&config.demo_storage_dir).with_context(|| {
        format!(
            "Failed to create demo storage directory: {:?}",
            config.demo_storage_dir
        )
    })?;

    let paths = config.storage_paths();
    info!("Primary data file: {:?}", paths.data_file);
    info!("Demo data file: {:?}", paths.demo_data_file);
    if config.demo_mode_only {
        info!("Demo mode is locked on for this deployment");
    }

    let state = AppState::new(paths, config.demo_mode_only);
    let app = router(state).layer(config.cors_layer());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("Listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutting down");
}
