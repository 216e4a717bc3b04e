use {
    crate::config::ServiceConfig,
    crate::routes::{AppState, router},
    log::{info, warn},
    ytved_core::Downloader,
};

pub mod config;
pub mod media;
pub mod request;
pub mod response;
pub mod routes;

pub use config::ConfigError;

/// Starts the HTTP service and runs it until Ctrl+C.
pub async fn serve(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let downloader = Downloader::new(config.core_config())?;
    info!("Downloads go to {}", downloader.download_dir().display());
    if config.isolate_downloads {
        info!("Each download gets its own directory");
    }

    let app = router(AppState::new(downloader));

    let address = config.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Listening on http://{}/api/v1", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
