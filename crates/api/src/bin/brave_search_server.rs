//! Brave Search MCP server: proxies web search queries to the Brave Search
//! API. Configuration comes from the environment (see
//! `brave-search.env.example`).

use config::SearchServerConfig;

#[tokio::main]
async fn main() {
    // Load a .env file if one is present, then read the process environment.
    dotenvy::dotenv().ok();

    let config = SearchServerConfig::from_env().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    });

    api::init_tracing(config.server.log_level);
    tracing::info!(
        auth_enabled = config.server.api_key.is_some(),
        upstream = %config.brave_search_api_url,
        "starting Brave Search MCP server"
    );

    let app = api::build_search_app(&config);
    if let Err(err) = api::serve(app, &config.server.host, config.server.port).await {
        tracing::error!(error = %err, "server terminated with an error");
        std::process::exit(1);
    }
}
