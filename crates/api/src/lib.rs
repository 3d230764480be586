// HTTP layer for the two MCP servers.
//
// Exposes router builders (used by the binaries and by router-level tests),
// the API-key auth middleware, and tracing/serve helpers. Business logic
// lives in the services crate; configuration in the config crate.

pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;

use std::io;
use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use config::{FilesystemServerConfig, LogLevel, SearchServerConfig};
use services::{files::FileAccess, search::SearchClient};
use utoipa::OpenApi as _;

use crate::middleware::{auth_middleware, AuthState};
use crate::openapi::{FilesystemApiDoc, SearchApiDoc};

/// Build the Brave Search proxy application.
pub fn build_search_app(config: &SearchServerConfig) -> Router {
    let client = Arc::new(SearchClient::from_config(config));

    let mut app = Router::new()
        .route("/", get(routes::search::status))
        .route("/search", post(routes::search::search));

    if let Some(api_key) = config.server.api_key.clone() {
        app = app.layer(from_fn_with_state(AuthState::new(api_key), auth_middleware));
    }

    // The OpenAPI document stays reachable without a key, like the rest of
    // the documentation surface.
    app.route("/openapi.json", get(|| async { Json(SearchApiDoc::openapi()) }))
        .with_state(client)
}

/// Build the filesystem access application.
pub fn build_filesystem_app(config: &FilesystemServerConfig) -> Router {
    let files = Arc::new(FileAccess::from_config(config));

    let mut app = Router::new()
        .route("/", get(routes::files::status))
        .route("/list", post(routes::files::list_files))
        .route("/read", post(routes::files::read_file));

    if let Some(api_key) = config.server.api_key.clone() {
        app = app.layer(from_fn_with_state(AuthState::new(api_key), auth_middleware));
    }

    app.route(
        "/openapi.json",
        get(|| async { Json(FilesystemApiDoc::openapi()) }),
    )
    .with_state(files)
}

/// Initialize tracing with a filter built from the configured level.
pub fn init_tracing(level: LogLevel) {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(level.as_filter_directive().to_string())
        .init();
}

/// Bind the listener and serve until ctrl-c.
pub async fn serve(app: Router, host: &str, port: u16) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("listening on {}:{}", host, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await
}
