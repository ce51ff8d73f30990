//! Web server wiring for the Nimbus dashboard and API.
//!
//! Owns the router, the shared application state, and the statistics
//! ticker. The manager never schedules its own updates; a background task
//! here drives `update_statistics` on the configured interval, mirroring
//! the dashboard's refresh cadence.

use std::time::Instant;

use axum::Router;
use axum::routing::{delete, get, post};
use nimbus_core::config::{AuthConfig, NimbusConfig};
use nimbus_core::torrent::{RandomWalkSource, TorrentManagerHandle, spawn_torrent_manager};
use tower_http::cors::CorsLayer;

use crate::handlers::api::{
    api_add_descriptor, api_add_magnet, api_delete_file, api_delete_torrent,
    api_download_archive, api_get_torrent, api_list_files, api_list_torrents,
    api_pause_torrent, api_resume_torrent,
};
use crate::handlers::pages::dashboard_page;

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    pub manager: TorrentManagerHandle,
    pub auth: AuthConfig,
    pub started_at: Instant,
}

/// Builds the application router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/api/torrents", get(api_list_torrents))
        .route("/api/torrents/magnet", post(api_add_magnet))
        .route("/api/torrents/file", post(api_add_descriptor))
        .route(
            "/api/torrents/{id}",
            get(api_get_torrent).delete(api_delete_torrent),
        )
        .route("/api/torrents/{id}/pause", post(api_pause_torrent))
        .route("/api/torrents/{id}/resume", post(api_resume_torrent))
        .route("/api/torrents/{id}/files", get(api_list_files))
        .route("/api/torrents/{id}/files/{name}", delete(api_delete_file))
        .route("/api/torrents/{id}/archive", get(api_download_archive))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Spawns the manager and ticker, then serves the dashboard until the
/// listener fails.
pub async fn run_server(
    config: NimbusConfig,
    host: String,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let refresh_interval = config.http.refresh_interval;
    let auth = config.auth.clone();

    let source = RandomWalkSource::new(config.simulation.clone());
    let manager = spawn_torrent_manager(config, source);

    let ticker = manager.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_interval);
        loop {
            interval.tick().await;
            if ticker.update_statistics().await.is_err() {
                tracing::debug!("Statistics ticker stopping: manager is gone");
                break;
            }
        }
    });

    let state = AppState {
        manager,
        auth,
        started_at: Instant::now(),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    tracing::info!("Nimbus listening on http://{host}:{port}");
    axum::serve(listener, app).await?;
    Ok(())
}
