use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use eduplatform::logging::init_tracing;
use eduplatform::metrics::{init_metrics, metrics_app};
use eduplatform::router::init_router;
use eduplatform::state::init_app_state;
use eduplatform_config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guards = init_tracing()?;

    let server_config = ServerConfig::from_env()?;
    let state = init_app_state(&server_config).await?;

    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .context("Failed to run database migrations")?;

    let mut app = init_router(state);
    if let Some(handle) = init_metrics()? {
        app = app.merge(metrics_app(handle));
    }

    let addr = format!("0.0.0.0:{}", server_config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server running on http://localhost:{}", server_config.port);
    info!(
        "Swagger UI available at http://localhost:{}/swagger-ui",
        server_config.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
