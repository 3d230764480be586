//! Handlers for the filesystem access server.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use services::files::{FileAccess, FileError};
use tracing::error;

use crate::models::{
    ErrorResponse, FileContentResponse, FileInfo, FileListRequest, FileListResponse,
    FileReadRequest, StatusResponse,
};

pub type FilesState = Arc<FileAccess>;

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
    tag = "Files"
)]
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "Filesystem MCP server is running".to_string(),
    })
}

/// List directory contents
///
/// Lists the entries of a directory, optionally walking the whole tree
/// beneath it. Paths must stay within the configured base directory.
#[utoipa::path(
    post,
    path = "/list",
    request_body = FileListRequest,
    responses(
        (status = 200, description = "Directory listing", body = FileListResponse),
        (status = 403, description = "Invalid API key or path outside the base directory", body = ErrorResponse),
        (status = 404, description = "Path not found", body = ErrorResponse),
    ),
    tag = "Files"
)]
pub async fn list_files(
    State(files): State<FilesState>,
    Json(request): Json<FileListRequest>,
) -> Result<Json<FileListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let entries = run_blocking(move || files.list(&request.path, request.recursive)).await?;
    Ok(Json(FileListResponse {
        files: entries.into_iter().map(FileInfo::from).collect(),
    }))
}

/// Read a file
///
/// Returns file content as UTF-8 text, or base64 when the content is not
/// valid UTF-8 (or base64 is requested explicitly).
#[utoipa::path(
    post,
    path = "/read",
    request_body = FileReadRequest,
    responses(
        (status = 200, description = "File content", body = FileContentResponse),
        (status = 400, description = "Path is a directory", body = ErrorResponse),
        (status = 403, description = "Invalid API key or path outside the base directory", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
    ),
    tag = "Files"
)]
pub async fn read_file(
    State(files): State<FilesState>,
    Json(request): Json<FileReadRequest>,
) -> Result<Json<FileContentResponse>, (StatusCode, Json<ErrorResponse>)> {
    let content =
        run_blocking(move || files.read(&request.path, request.encoding.as_deref())).await?;
    Ok(Json(FileContentResponse::from(content)))
}

/// Run a filesystem operation on the blocking pool and map its errors.
async fn run_blocking<T, F>(operation: F) -> Result<T, (StatusCode, Json<ErrorResponse>)>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, FileError> + Send + 'static,
{
    match tokio::task::spawn_blocking(operation).await {
        Ok(result) => result.map_err(map_file_error),
        Err(join_err) => {
            error!(error = %join_err, "filesystem task failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "Filesystem operation failed".to_string(),
                    "internal_error".to_string(),
                )),
            ))
        }
    }
}

fn map_file_error(err: FileError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, error_type) = match &err {
        FileError::OutsideBasePath { .. } => (StatusCode::FORBIDDEN, "forbidden_path"),
        FileError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
        FileError::IsDirectory { .. } => (StatusCode::BAD_REQUEST, "invalid_request_error"),
        FileError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(error = %err, "filesystem operation failed");
    }
    (status, Json(ErrorResponse::new(err.to_string(), error_type.to_string())))
}
