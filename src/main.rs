use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use docdispatch::application::ports::WorkingStore;
use docdispatch::application::services::DispatchPipeline;
use docdispatch::infrastructure::observability::{TracingConfig, init_tracing};
use docdispatch::infrastructure::processors::ProcessorFactory;
use docdispatch::infrastructure::storage::LocalWorkingStore;
use docdispatch::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (environment, settings) = Settings::load().context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(environment, &settings.logging));

    let store: Arc<dyn WorkingStore> = Arc::new(
        LocalWorkingStore::new(
            settings.storage.upload_dir.clone(),
            settings.storage.processed_dir.clone(),
        )
        .context("Failed to prepare working directories")?,
    );

    let registry = ProcessorFactory::create(&settings.vision)
        .context("Failed to build processor registry")?;

    let pipeline = Arc::new(DispatchPipeline::new(
        Arc::new(registry),
        store,
        settings.storage.cleanup_policy,
        settings.processing.timeout(),
    ));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;

    let router = create_router(AppState::new(pipeline, settings));

    tracing::info!(%addr, %environment, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
