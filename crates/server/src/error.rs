//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog::StoreError;
use recommend::ResolveError;
use thiserror::Error;
use tracing::error;

/// Errors surfaced to HTTP callers as status + message.
///
/// Internal detail is logged, never sent to the client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("missing or invalid bearer token")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(detail) => {
                error!(detail = %detail, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StoreError::Conflict { .. } => ApiError::Conflict(err.to_string()),
            StoreError::InvalidRecord { .. } => ApiError::BadRequest(err.to_string()),
            StoreError::Unavailable(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::OrderNotFound(_) => ApiError::NotFound(err.to_string()),
            ResolveError::Conflict(_) => ApiError::Conflict(err.to_string()),
            ResolveError::Store(store_err) => store_err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_errors_map_to_statuses() {
        let not_found: ApiError = ResolveError::OrderNotFound(9).into();
        assert!(matches!(not_found, ApiError::NotFound(_)));

        let conflict: ApiError = ResolveError::Conflict(9).into();
        assert!(matches!(conflict, ApiError::Conflict(_)));

        let internal: ApiError =
            ResolveError::Store(StoreError::Unavailable("down".to_string())).into();
        assert!(matches!(internal, ApiError::Internal(_)));
    }

    #[test]
    fn test_internal_message_is_opaque() {
        let err = ApiError::Internal("connection refused".to_string());
        assert_eq!(err.to_string(), "internal error");
    }
}
