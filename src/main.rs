use downvote_dashboard::{router, ApiClient, AppConfig, AppState, TAXONOMY};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = AppConfig::from_env();
    for overlap in TAXONOMY.overlaps() {
        warn!(
            "r/{} is listed under {:?}; comments go to {}",
            overlap.subreddit, overlap.categories, overlap.categories[0]
        );
    }

    let client = ApiClient::new(config.api_base_url.clone());
    info!("using statistics API at {}", client.base_url());

    let state = AppState::new(client, TAXONOMY);
    state.spawn_dashboard_load().await;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.controller.lock().await.unmount();
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
    }
}
