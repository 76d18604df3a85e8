//! Foodgram backend library.
//!
//! This crate initializes the Axum web server, sets up database connections,
//! and registers all API routes and middleware. It orchestrates the
//! application's startup and defines its overall structure; `main.rs` only
//! parses the command line.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod middleware;
pub mod services;
pub mod state;
pub mod utils;

use axum::{routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower_http::services::ServeDir;
use tracing::info;

pub use config::Config;
pub use state::AppState;

/// Builds the full router: API routes, media files and middleware.
pub fn build_app(state: AppState) -> Router {
    let media = ServeDir::new(&state.config.media_root);
    let media_url = state.config.media_url.trim_end_matches('/').to_string();

    let router = Router::new()
        .route("/", get(root_handler))
        .merge(api::api_router());

    let router = if media_url.is_empty() {
        router
    } else {
        router.nest_service(&media_url, media)
    };

    router
        .layer(middleware::cors())
        .layer(middleware::trace())
        .with_state(state)
}

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Initializing state...");
    let address = config.address();
    let state = AppState::from_config(config).await?;

    let app = build_app(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn root_handler() -> &'static str {
    "Welcome to Foodgram!"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        } else {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
