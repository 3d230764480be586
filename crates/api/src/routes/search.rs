//! Handlers for the Brave Search proxy server.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use services::search::{SearchClient, SearchError, SearchQuery};
use tracing::error;

use crate::models::{ErrorResponse, SearchRequest, SearchResponse, StatusResponse};

pub type SearchState = Arc<SearchClient>;

/// Status endpoint
///
/// Reports that the server is up. Useful for monitoring and load balancers.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Server is running", body = StatusResponse),
        (status = 403, description = "Invalid API key", body = ErrorResponse),
    ),
    tag = "Search"
)]
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "Brave Search MCP server is running".to_string(),
    })
}

/// Web search
///
/// Forwards the query to the upstream Brave Search API and returns the
/// mapped result page.
#[utoipa::path(
    post,
    path = "/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Search results", body = SearchResponse),
        (status = 403, description = "Invalid API key", body = ErrorResponse),
        (status = 502, description = "Upstream search API unreachable", body = ErrorResponse),
    ),
    tag = "Search"
)]
pub async fn search(
    State(client): State<SearchState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let query = SearchQuery::from(&request);
    match client.search(&query).await {
        Ok(page) => Ok(Json(SearchResponse::from(page))),
        Err(err) => Err(map_search_error(err)),
    }
}

fn map_search_error(err: SearchError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        // Upstream rejections keep their status so clients can tell a rate
        // limit from a bad credential.
        SearchError::UpstreamStatus { status, body } => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            Json(ErrorResponse::new(
                format!("Brave Search API error: {body}"),
                "upstream_error".to_string(),
            )),
        ),
        SearchError::Http(err) => {
            error!(error = %err, "upstream search request failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new(
                    "Failed to reach the upstream search API".to_string(),
                    "upstream_unreachable".to_string(),
                )),
            )
        }
    }
}
