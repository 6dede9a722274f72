//! Responses for requests no member handler accepts

use axum::http::{Method, Uri};

use crate::error::ApiError;

/// Unknown path
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {} {}", method, uri.path()))
}

/// Known path, unsupported method
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!("{} is not supported for {}", method, uri.path()))
}
