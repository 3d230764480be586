//! Request and response bodies for both server surfaces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use services::files::{FileContent, FileEntry};
use services::search::{SearchPage, SearchQuery};
use utoipa::ToSchema;

/// Body of `POST /search`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchRequest {
    /// Search terms forwarded upstream.
    pub query: String,
    /// Results per page.
    #[serde(default = "default_count")]
    pub count: u32,
    /// Zero-based result offset for pagination.
    #[serde(default)]
    pub offset: u32,
    /// Two-letter country code biasing the results.
    #[serde(default = "default_country")]
    pub country: String,
    /// Language of the results.
    #[serde(default = "default_search_lang")]
    pub search_lang: String,
}

fn default_count() -> u32 {
    10
}

fn default_country() -> String {
    "US".to_string()
}

fn default_search_lang() -> String {
    "en".to_string()
}

impl From<&SearchRequest> for SearchQuery {
    fn from(request: &SearchRequest) -> Self {
        Self {
            query: request.query.clone(),
            count: request.count,
            offset: request.offset,
            country: request.country.clone(),
            search_lang: request.search_lang.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

impl From<services::search::SearchResult> for SearchResult {
    fn from(result: services::search::SearchResult) -> Self {
        Self {
            title: result.title,
            url: result.url,
            description: result.description,
            published_date: result.published_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_count: u64,
    /// Offset to request for the next page, absent on the last page.
    pub next_offset: Option<u32>,
}

impl From<SearchPage> for SearchResponse {
    fn from(page: SearchPage) -> Self {
        Self {
            results: page.results.into_iter().map(SearchResult::from).collect(),
            total_count: page.total_count,
            next_offset: page.next_offset,
        }
    }
}

/// Body of `POST /list`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileListRequest {
    pub path: String,
    /// Walk the whole tree beneath `path` instead of one level.
    #[serde(default)]
    pub recursive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileInfo {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    /// Size in bytes, absent for directories.
    pub size: Option<u64>,
    pub modified: Option<DateTime<Utc>>,
}

impl From<FileEntry> for FileInfo {
    fn from(entry: FileEntry) -> Self {
        Self {
            name: entry.name,
            path: entry.path.display().to_string(),
            is_dir: entry.is_dir,
            size: entry.size,
            modified: entry.modified,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileListResponse {
    pub files: Vec<FileInfo>,
}

/// Body of `POST /read`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileReadRequest {
    pub path: String,
    /// `base64` forces binary-safe output; anything else reads UTF-8 text.
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileContentResponse {
    pub content: String,
    /// Either `utf-8` or `base64`.
    pub encoding: String,
}

impl From<FileContent> for FileContentResponse {
    fn from(content: FileContent) -> Self {
        Self {
            content: content.content,
            encoding: content.encoding,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
}

impl ErrorResponse {
    pub fn new(message: String, error_type: String) -> Self {
        Self {
            error: ErrorDetail {
                message,
                r#type: error_type,
            },
        }
    }
}
