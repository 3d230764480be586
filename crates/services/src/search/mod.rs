//! Client for the upstream Brave Search web API.

use config::{SearchServerConfig, Secret};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Header carrying the upstream credential.
const SUBSCRIPTION_TOKEN_HEADER: &str = "X-Subscription-Token";

#[derive(Debug, Error)]
pub enum SearchError {
    /// The upstream API answered with a non-success status.
    #[error("upstream search API returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The request never produced an upstream answer (connect failure,
    /// timeout, malformed payload).
    #[error("upstream search request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// One web search, with the same defaults the HTTP surface documents.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub query: String,
    pub count: u32,
    pub offset: u32,
    pub country: String,
    pub search_lang: String,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            count: 10,
            offset: 0,
            country: "US".to_string(),
            search_lang: "en".to_string(),
        }
    }
}

/// One result row of a search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub description: String,
    pub published_date: Option<String>,
}

/// A page of results plus pagination state.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub total_count: u64,
    /// Offset of the next page, when one exists.
    pub next_offset: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct SearchClient {
    http: Client,
    endpoint: Url,
    api_key: Secret,
}

impl SearchClient {
    pub fn new(endpoint: Url, api_key: Secret) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            api_key,
        }
    }

    pub fn from_config(config: &SearchServerConfig) -> Self {
        Self::new(
            config.brave_search_api_url.clone(),
            config.brave_api_key.clone(),
        )
    }

    /// Run one web search against the configured endpoint.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchPage, SearchError> {
        debug!(count = query.count, offset = query.offset, "forwarding search query");

        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[
                ("q", query.query.as_str()),
                ("country", query.country.as_str()),
                ("search_lang", query.search_lang.as_str()),
            ])
            .query(&[("count", query.count), ("offset", query.offset)])
            .header(ACCEPT, "application/json")
            .header(SUBSCRIPTION_TOKEN_HEADER, self.api_key.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let payload: WebSearchPayload = response.json().await?;
        Ok(page_from_payload(payload, query))
    }
}

// Subset of the upstream response shape this proxy cares about. Missing
// sections map to empty results, matching lenient upstream handling.
#[derive(Debug, Deserialize)]
struct WebSearchPayload {
    #[serde(default)]
    web: WebResults,
}

#[derive(Debug, Default, Deserialize)]
struct WebResults {
    #[serde(default)]
    results: Vec<WebResultItem>,
    #[serde(default)]
    total_results: u64,
}

#[derive(Debug, Deserialize)]
struct WebResultItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
    published_date: Option<String>,
}

fn page_from_payload(payload: WebSearchPayload, query: &SearchQuery) -> SearchPage {
    let web = payload.web;
    let results = web
        .results
        .into_iter()
        .map(|item| SearchResult {
            title: item.title,
            url: item.url,
            description: item.description,
            published_date: item.published_date,
        })
        .collect();

    SearchPage {
        results,
        total_count: web.total_results,
        next_offset: next_offset(query.offset, query.count, web.total_results),
    }
}

/// The next page starts at `offset + count`, unless that already reaches
/// past the total result count.
fn next_offset(offset: u32, count: u32, total: u64) -> Option<u32> {
    (u64::from(offset) + u64::from(count) < total).then(|| offset + count)
}
