use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use configuration::Settings;
use database::Gateway;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
// Note: Tracing is handled by the main application configuration

pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod rpc;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
}

/// Builds the router: the remote method endpoint plus a health check.
///
/// The dashboard is served from another origin, so CORS is wide open.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/BackendService", post(handlers::rpc))
        .route("/rpc", post(handlers::rpc))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// Connects the gateway, serves until Ctrl-C, then releases the pool.
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let addr = settings.server.socket_addr()?;
    let gateway = Gateway::connect(&settings.database).await;

    let app_state = Arc::new(AppState {
        gateway: gateway.clone(),
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server started and listening on {}", addr);

    axum::serve(listener, app(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    gateway.close().await;
    tracing::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Unable to listen for the shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
