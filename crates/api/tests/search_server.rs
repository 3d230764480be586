use axum::{
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_test::TestServer;
use config::{LogLevel, SearchServerConfig, Secret, ServerConfig};
use serde_json::{json, Value};

fn search_config(upstream_url: &str, api_key: Option<Secret>) -> SearchServerConfig {
    SearchServerConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8001,
            log_level: LogLevel::Info,
            api_key,
        },
        brave_api_key: Secret::new("upstream-key"),
        brave_search_api_url: url::Url::parse(upstream_url).unwrap(),
    }
}

fn test_server(upstream_url: &str, api_key: Option<Secret>) -> TestServer {
    TestServer::new(api::build_search_app(&search_config(upstream_url, api_key))).unwrap()
}

/// Serve `app` on an ephemeral local port and return the upstream URL.
async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/search")
}

/// A stand-in upstream that insists on the subscription token header.
fn upstream_with_results() -> Router {
    Router::new().route(
        "/search",
        get(|headers: HeaderMap| async move {
            let token = headers
                .get("X-Subscription-Token")
                .and_then(|value| value.to_str().ok());
            if token != Some("upstream-key") {
                return StatusCode::UNAUTHORIZED.into_response();
            }
            Json(json!({
                "web": {
                    "results": [
                        {
                            "title": "Rust Programming Language",
                            "url": "https://www.rust-lang.org/",
                            "description": "A language empowering everyone",
                            "published_date": "2024-01-01"
                        }
                    ],
                    "total_results": 42
                }
            }))
            .into_response()
        }),
    )
}

#[tokio::test]
async fn status_reports_running() {
    let server = test_server("http://127.0.0.1:9/search", None);

    let response = server.get("/").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "Brave Search MCP server is running");
}

#[tokio::test]
async fn search_maps_the_upstream_page() {
    let upstream_url = spawn_upstream(upstream_with_results()).await;
    let server = test_server(&upstream_url, None);

    let response = server.post("/search").json(&json!({ "query": "rust" })).await;

    assert_eq!(response.status_code(), 200, "{}", response.text());
    let body: Value = response.json();
    assert_eq!(body["total_count"], 42);
    assert_eq!(body["next_offset"], 10);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["title"], "Rust Programming Language");
    assert_eq!(results[0]["published_date"], "2024-01-01");
}

#[tokio::test]
async fn upstream_error_status_passes_through() {
    let upstream = Router::new().route(
        "/search",
        get(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
    );
    let upstream_url = spawn_upstream(upstream).await;
    let server = test_server(&upstream_url, None);

    let response = server.post("/search").json(&json!({ "query": "rust" })).await;

    assert_eq!(response.status_code(), 429);
    let body: Value = response.json();
    assert_eq!(body["error"]["type"], "upstream_error");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("rate limited"));
}

#[tokio::test]
async fn unreachable_upstream_is_a_bad_gateway() {
    // Nothing listens on the discard port.
    let server = test_server("http://127.0.0.1:9/search", None);

    let response = server.post("/search").json(&json!({ "query": "rust" })).await;

    assert_eq!(response.status_code(), 502);
    let body: Value = response.json();
    assert_eq!(body["error"]["type"], "upstream_unreachable");
}

#[tokio::test]
async fn request_without_a_query_is_rejected() {
    let server = test_server("http://127.0.0.1:9/search", None);

    let response = server.post("/search").json(&json!({ "count": 5 })).await;

    assert_eq!(response.status_code(), 422);
}

#[tokio::test]
async fn requests_without_the_configured_key_are_rejected() {
    let upstream_url = spawn_upstream(upstream_with_results()).await;
    let server = test_server(&upstream_url, Some(Secret::new("inbound-key")));

    let response = server.post("/search").json(&json!({ "query": "rust" })).await;
    assert_eq!(response.status_code(), 403);

    let response = server
        .post("/search")
        .add_header("X-MCP-API-Key", "inbound-key")
        .json(&json!({ "query": "rust" }))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn openapi_document_is_served_without_a_key() {
    let server = test_server("http://127.0.0.1:9/search", Some(Secret::new("inbound-key")));

    let response = server.get("/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["paths"]["/search"].is_object());
}
