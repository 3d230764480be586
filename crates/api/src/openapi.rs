use utoipa::OpenApi;

use crate::models::{
    ErrorDetail, ErrorResponse, FileContentResponse, FileInfo, FileListRequest, FileListResponse,
    FileReadRequest, SearchRequest, SearchResponse, SearchResult, StatusResponse,
};

/// OpenAPI documentation for the Brave Search proxy server.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Brave Search MCP Server",
        description = "Proxies web search queries to the Brave Search API. When an API key is configured, requests must carry it in the `X-MCP-API-Key` header.",
        version = "0.1.0",
    ),
    paths(crate::routes::search::status, crate::routes::search::search),
    components(schemas(
        SearchRequest,
        SearchResponse,
        SearchResult,
        StatusResponse,
        ErrorResponse,
        ErrorDetail,
    )),
    tags((name = "Search", description = "Web search proxy endpoints"))
)]
pub struct SearchApiDoc;

/// OpenAPI documentation for the filesystem access server.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Filesystem MCP Server",
        description = "Lists and reads files, optionally confined beneath a base directory. When an API key is configured, requests must carry it in the `X-MCP-API-Key` header.",
        version = "0.1.0",
    ),
    paths(
        crate::routes::files::status,
        crate::routes::files::list_files,
        crate::routes::files::read_file,
    ),
    components(schemas(
        FileListRequest,
        FileListResponse,
        FileInfo,
        FileReadRequest,
        FileContentResponse,
        StatusResponse,
        ErrorResponse,
        ErrorDetail,
    )),
    tags((name = "Files", description = "Sandboxed filesystem endpoints"))
)]
pub struct FilesystemApiDoc;
