//! Filesystem MCP server: lists and reads files, optionally confined
//! beneath a base directory. Configuration comes from the environment (see
//! `filesystem.env.example`).

use config::FilesystemServerConfig;

#[tokio::main]
async fn main() {
    // Load a .env file if one is present, then read the process environment.
    dotenvy::dotenv().ok();

    let config = FilesystemServerConfig::from_env().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    });

    api::init_tracing(config.server.log_level);
    match &config.base_path {
        Some(base_path) => tracing::info!(
            auth_enabled = config.server.api_key.is_some(),
            base_path = %base_path.display(),
            "starting Filesystem MCP server"
        ),
        None => tracing::info!(
            auth_enabled = config.server.api_key.is_some(),
            "starting Filesystem MCP server without a base path restriction"
        ),
    }

    let app = api::build_filesystem_app(&config);
    if let Err(err) = api::serve(app, &config.server.host, config.server.port).await {
        tracing::error!(error = %err, "server terminated with an error");
        std::process::exit(1);
    }
}
