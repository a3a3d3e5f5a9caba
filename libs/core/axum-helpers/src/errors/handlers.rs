use axum::{
    http::Uri,
    response::{IntoResponse, Response},
};

use super::AppError;

/// Router fallback for unknown paths
pub async fn not_found(uri: Uri) -> Response {
    AppError::NotFound(format!("No route for {}", uri.path())).into_response()
}

/// Fallback for known paths hit with an unsupported method
pub async fn method_not_allowed() -> Response {
    AppError::MethodNotAllowed.into_response()
}
