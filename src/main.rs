use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use intervue::logging::init_tracing;
use intervue::metrics::init_metrics;
use intervue::router::init_router;
use intervue::state::init_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let state = init_app_state()?.with_metrics(init_metrics()?);
    let addr = state
        .server_config
        .bind_addr()
        .context("invalid HOST/PORT")?;

    info!(
        upload_dir = %state.uploads.dir().display(),
        development = state.server_config.is_development(),
        "Configuration loaded"
    );

    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server running on http://{addr}");
    info!("OpenAPI document at http://{addr}/api-docs/openapi.json");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;

    Ok(())
}
